mod run;
mod scan;

pub use run::cmd_run;
pub use scan::cmd_scan;
