//! Client-side state synchronization primitives shared by the view-models.
pub mod bus;
pub mod dismiss;
pub mod listeners;
pub mod paginated;
pub mod refresh;
pub mod sources;
pub mod suggestions;

pub use bus::{InvalidationBus, Signal};
pub use dismiss::{Nowhere, OutsideDismiss, Point, PointerHub, Rect, Region};
pub use listeners::{ListenerSet, Subscription};
pub use paginated::{LoadOutcome, PageSource, PaginatedQuery, QuerySnapshot};
pub use refresh::{RefreshHandle, Refreshable};
pub use sources::{DocumentsByTag, TagsBySearch};
pub use suggestions::TagSuggestions;
