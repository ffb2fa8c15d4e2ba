//! Lookup Service: parameterized point queries against the read-only
//! reference store.
//!
//! Misses come back as `None` (or a placeholder row for colleges). Only a
//! failing primary query is an error; secondary queries degrade to a miss.

pub mod college;
pub mod sat;
