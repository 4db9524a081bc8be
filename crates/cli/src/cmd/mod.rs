mod mpi_select;
mod reload;
mod status;

pub use mpi_select::cmd_mpi_select;
pub use reload::cmd_reload;
pub use status::cmd_status;
