pub mod error;
pub mod query;
pub mod supabase;

pub use error::StoreError;
pub use query::{FilterOp, Query};
pub use supabase::SupabaseClient;
