pub(crate) mod cli;
pub(crate) mod logging;
pub(crate) mod run;
