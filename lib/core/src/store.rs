use crate::filter::Filter;
use crate::listing::{Listing, ListingId, NewListing};
use crate::Result;

/// Persistent home of listing records.
///
/// Implementations must be safe to share between request handlers.
pub trait ListingStore: Send + Sync {
    /// Validate and insert a listing, assigning the next unused id
    fn insert(&self, new: NewListing) -> Result<Listing>;

    /// Fetch one listing; [`crate::Error::ListingNotFound`] when absent
    fn get_by_id(&self, id: ListingId) -> Result<Listing>;

    /// Every listing except `id`, in ascending id order
    fn get_all_except(&self, id: ListingId) -> Result<Vec<Listing>>;

    /// Listings accepted by `filter`, newest first
    fn search(&self, filter: &dyn Filter) -> Result<Vec<Listing>>;

    /// Hard-delete a listing and return the removed record
    fn delete(&self, id: ListingId) -> Result<Listing>;

    fn count(&self) -> usize;
}
