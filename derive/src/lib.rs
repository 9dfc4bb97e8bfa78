use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod measurement_sink;

#[proc_macro_derive(MeasurementSink, attributes(measurement))]
pub fn derive_measurement_sink(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match measurement_sink::expand_measurement_sink(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error().into(),
    }
}
