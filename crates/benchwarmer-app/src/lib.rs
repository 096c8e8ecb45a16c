// Library root: the season pipeline and report writers behind the
// `benchwarmer` binary, exposed for integration tests.

pub mod pipeline;
pub mod report;
pub mod source;
