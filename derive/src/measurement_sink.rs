use std::collections::HashSet;

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{
    Data, DeriveInput, Error, ExprClosure, Field, Fields, GenericArgument, Ident, Pat,
    PathArguments, Result, Token, Type,
    parse::{Parse, ParseStream},
    spanned::Spanned,
};

/// Measurement keys, each naming a `set_<key>` method of the sink trait.
const KEYS: &[&str] = &[
    "temperature",
    "humidity",
    "pressure",
    "wind_speed",
    "wind_gust",
    "wind_direction_degrees",
    "accumulated_precipitation",
    "precipitation_intensity",
    "light",
    "uv_intensity",
    "uv_index",
    "battery_level",
    "night",
    "wind_speed_text",
    "wind_direction_text",
    "light_text",
    "precipitation_intensity_text",
    "weather_conditions_text",
];

pub(crate) fn expand_measurement_sink(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        Err(Error::new(
            input.span(),
            "`MeasurementSink` may only be derived on structs.",
        ))?
    };

    let Fields::Named(fields) = &data.fields else {
        Err(Error::new(
            input.span(),
            "`MeasurementSink` may only be derived on structs with named fields.",
        ))?
    };

    let fields = fields
        .named
        .iter()
        .map(FieldMetadata::parse)
        .map(Result::transpose)
        .flatten() // Skip fields without an attribute.
        .collect::<Result<Vec<_>>>()?;

    let mut seen = HashSet::new();

    for field in &fields {
        if !seen.insert(field.key.to_string()) {
            Err(Error::new_spanned(
                &field.key,
                "Measurement keys must be unique.",
            ))?
        }
    }

    let methods = fields.into_iter().map(|field| {
        let FieldMetadata {
            name,
            key,
            primitive,
            handler,
        } = field;

        let assignment = if let Some((field_type, handler)) = handler {
            let body = handler.body;
            let acc = handler.inputs.iter().nth(0).unwrap();
            let val = handler.inputs.iter().nth(1).unwrap();

            quote! {
                (|#acc: &mut #field_type, #val| {#body})(&mut self.#name, value)
            }
        } else {
            quote! {
                self.#name = Some(value)
            }
        };

        let method = format_ident!("set_{}", key);

        quote! {
            fn #method(&mut self, value: #primitive) {
                #assignment;
            }
        }
    });

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::misol::avec::MeasurementSink for #name #ty_generics #where_clause {
            #(#methods)*
        }
    };

    Ok(expanded.into())
}

#[derive(Debug)]
struct FieldMetadata {
    name: Ident,
    key: Ident,
    primitive: Type,
    handler: Option<(Type, ExprClosure)>,
}

impl FieldMetadata {
    fn parse(field: &Field) -> Result<Option<Self>> {
        let name = field.ident.clone().unwrap();

        let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("measurement")) else {
            return Ok(None);
        };

        let MeasurementAttribute { key, handler } = attr.meta.require_list()?.parse_args()?;

        let primitive = if let Some(handler) = &handler {
            let Some(parameter) = handler.inputs.iter().nth(1) else {
                Err(Error::new_spanned(
                    handler,
                    "Handler closure must have two parameters.",
                ))?
            };

            let Pat::Type(pat_type) = parameter else {
                Err(Error::new_spanned(
                    parameter,
                    "Handler closure's second parameter must be annotated with the measurement's type.",
                ))?
            };

            (*pat_type.ty).clone()
        } else {
            option_inner(&field.ty)?
        };

        let handler = handler.map(|h| (field.ty.clone(), h));

        Ok(Some(Self {
            name,
            key,
            primitive,
            handler,
        }))
    }
}

/// The `T` of a field typed `Option<T>`.
fn option_inner(ty: &Type) -> Result<Type> {
    let Type::Path(path) = ty else {
        Err(Error::new_spanned(ty, "Field must have a type annotation."))?
    };

    let Some(segment) = path.path.segments.last() else {
        Err(Error::new_spanned(
            &path.path.segments,
            "Field must have a type annotation.",
        ))?
    };

    if segment.ident != "Option" {
        Err(Error::new_spanned(
            &segment.ident,
            "Field without a handler must have type `Option<T>`.",
        ))?
    }

    let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
        Err(Error::new_spanned(
            &segment.arguments,
            "Field of type `Option<T>` must have a generic parameter.",
        ))?
    };

    let Some(GenericArgument::Type(inner_type)) = arguments.args.first() else {
        Err(Error::new_spanned(
            &arguments.args,
            "Generic argument of a field of type `Option<T>` must be a type.",
        ))?
    };

    Ok(inner_type.clone())
}

#[derive(Debug)]
struct MeasurementAttribute {
    key: Ident,
    handler: Option<ExprClosure>,
}

impl Parse for MeasurementAttribute {
    fn parse(input: ParseStream) -> Result<Self> {
        let key = input.parse::<Ident>()?;

        if !KEYS.contains(&key.to_string().as_str()) {
            Err(Error::new_spanned(
                &key,
                format!("Unknown measurement `{key}`, expected one of: {}.", KEYS.join(", ")),
            ))?
        }

        let handler = if !input.is_empty() {
            input.parse::<Token![,]>()?;
            Some(input.parse::<ExprClosure>()?)
        } else {
            None
        };

        Ok(Self { key, handler })
    }
}
