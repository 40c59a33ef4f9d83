//! Message text handling ahead of aggregation.
//!
//! # Responsibility
//! - Turn raw message text into normalized word tokens.
//! - Remember which message ids already contributed to the aggregate.
//!
//! # See also
//! - `store` for where tokens are counted.

pub mod dedup;
pub mod tokenizer;
