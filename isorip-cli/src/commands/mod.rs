mod convert;
mod extract;
mod info;
mod ls;

pub(crate) use convert::run_convert;
pub(crate) use extract::{run_extract, run_extract_all};
pub(crate) use info::run_info;
pub(crate) use ls::run_ls;
