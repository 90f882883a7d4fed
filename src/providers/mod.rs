pub mod namecheap;
pub(crate) mod utils;
