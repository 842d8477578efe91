//! C ABI for hosts loading the plugin as a shared library

pub mod exports;
