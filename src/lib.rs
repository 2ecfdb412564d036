//! Launch records dashboard core.
//!
//! [`data`] holds the dataset model, the file loaders and the two chart
//! queries. The egui front end in the `launch-dash` binary only collects the
//! current selection and renders what these queries return.

pub mod config;
pub mod data;
