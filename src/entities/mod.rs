// Entity Models - one typed row per table
//
// Each entity carries:
// - its natural key (company id, train number, route/segment composite keys)
// - the attribute values exactly as the XML gave them
// - an explicit insert into its own table

pub mod company;
pub mod route;
pub mod segment;
pub mod station;
pub mod train;

pub use company::{Company, CompanyName, CompanyResolver};
pub use route::Route;
pub use segment::RouteSegment;
pub use station::Station;
pub use train::Train;
