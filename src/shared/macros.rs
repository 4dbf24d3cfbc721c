/***************************************/
/*               Macros                */
/***************************************/

/// Unwraps a `Result` at the process boundary, logging the error and exiting with status 1.
#[macro_export]
macro_rules! unwrap_or_exit {
    ($expr:expr) => {
        match $expr {
            Ok(val) => val,
            Err(e) => {
                log::error!("ERROR: {}", e);
                std::process::exit(1);
            }
        }
    };
}
