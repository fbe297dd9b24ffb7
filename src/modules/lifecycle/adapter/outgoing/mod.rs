pub mod db;
pub mod reference_lookup_postgres;

pub use reference_lookup_postgres::ReferenceLookupPostgres;
