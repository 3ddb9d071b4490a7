// Interface adapters: controller wire protocol, HTTP client, terminal prompt
// and console reporting.

pub mod clients;
pub mod console;
pub mod prompt;
pub mod protocol;
