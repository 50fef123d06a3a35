//! End-to-end scenarios at the `NodeDb` level.
//!
//! Each file covers one scenario with deterministic inputs, going through
//! the public API from write to search or stream.


mod test_concurrent_scans;
mod test_empty_range;
mod test_iterator_fault;
mod test_key_filter;
mod test_pagination;
mod test_reverse_order;
mod test_stream_cancellation;
mod test_stream_parity;
mod test_suffix_listing;
mod test_value_filter;
