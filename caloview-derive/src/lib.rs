//! Derive macros for caloview.
//!
//! This crate provides one derive macro:
//!
//! - [`Record`] - Generates a columnar table type for a flat record struct
//!
//! # Usage
//!
//! The macro is re-exported from the main `caloview` crate. You don't need
//! to add this crate directly:
//!
//! ```ignore
//! use caloview::Record;
//!
//! #[derive(Record, Debug, Clone)]
//! #[record(table = "HitTable", rows = "hits")]
//! pub struct Hit {
//!     pub cell_id: u64,
//!     #[record(unit = "GeV")]
//!     pub energy: f64,
//!     pub x: f64,
//! }
//!
//! let table = HitTable::new(vec![/* ... */]);
//! let xs: &[f64] = &table.x;
//! for hit in &table { /* ... */ }
//! ```
//!
//! # The Record Macro
//!
//! `#[derive(Record)]` turns a struct of named fields into a row type and
//! generates its table. The table keeps the rows in their original order and
//! one `Vec` column per field, so callers can either iterate records or hand
//! whole columns to a renderer.
//!
//! ## Struct Attributes
//!
//! - `table = "Name"` - name of the generated table struct (required)
//! - `rows = "name"` - name of the row accessor (defaults to `rows`)
//!
//! ## Field Attributes
//!
//! - `unit = "GeV"` - unit suffix appended by `inspect_fields()`

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, Ident, LitStr, Type};

/// Derive macro for flat record structs.
///
/// Generates, for a record `Row` with `#[record(table = "RowTable")]`:
///
/// - `pub struct RowTable` with the ordered rows and one `pub` column per field
/// - `RowTable::new(Vec<Row>)`, `len()`, `is_empty()`, `iter()` and the rows accessor
/// - `impl IntoIterator for &RowTable` and `impl FromIterator<Row> for RowTable`
/// - `impl caloview::Record for Row` and `impl caloview::Table for RowTable`
///
/// # Generated Code
///
/// ```ignore
/// #[derive(Debug, Clone, Default)]
/// pub struct HitTable {
///     hits: Vec<Hit>,
///     pub cell_id: Vec<u64>,
///     pub energy: Vec<f64>,
///     pub x: Vec<f64>,
/// }
/// ```
///
/// Columns are built once in `new()`; the table has no mutating methods.
///
/// # Panics
///
/// The macro panics at compile time if:
/// - Applied to an enum or union instead of a struct
/// - Struct uses tuple fields instead of named fields
/// - The `table` attribute is missing
/// - An attribute key is not recognized
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let vis = &input.vis;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => panic!("Record derive only supports structs with named fields"),
        },
        _ => panic!("Record derive only supports structs"),
    };

    let options = parse_struct_options(&input.attrs);
    let table_name = Ident::new(
        &options
            .table
            .unwrap_or_else(|| panic!("Record derive on '{}' needs #[record(table = \"...\")]", name)),
        Span::call_site(),
    );
    let rows_name = Ident::new(options.rows.as_deref().unwrap_or("rows"), Span::call_site());

    let mut column_fields = Vec::new();
    let mut column_inits = Vec::new();
    let mut field_names = Vec::new();
    let mut inspect_entries = Vec::new();

    for field in fields.iter() {
        let field_name = field.ident.as_ref().unwrap();
        let field_name_str = field_name.to_string();
        let field_type = &field.ty;
        let unit = parse_field_unit(&field.attrs);

        let doc = format!("Column of `{}` values, one per row.", field_name_str);
        column_fields.push(quote! {
            #[doc = #doc]
            pub #field_name: Vec<#field_type>
        });
        column_inits.push(quote! {
            #field_name: #rows_name.iter().map(|row| row.#field_name.clone()).collect()
        });
        field_names.push(field_name_str.clone());

        let inspect_format = generate_inspect_format(field_name, field_type, unit.as_deref());
        inspect_entries.push(quote! { (#field_name_str, #inspect_format) });
    }

    let table_doc = format!("Columnar table of [`{}`] rows.", name);
    let rows_doc = format!("The `{}` rows in their original order.", name);

    let expanded = quote! {
        #[doc = #table_doc]
        #[derive(Debug, Clone, Default)]
        #vis struct #table_name {
            #rows_name: Vec<#name>,
            #(#column_fields),*
        }

        impl #table_name {
            /// Build the table, filling every column from `rows`.
            pub fn new(#rows_name: Vec<#name>) -> Self {
                Self {
                    #(#column_inits,)*
                    #rows_name,
                }
            }

            #[doc = #rows_doc]
            pub fn #rows_name(&self) -> &[#name] {
                &self.#rows_name
            }

            /// Number of rows.
            pub fn len(&self) -> usize {
                self.#rows_name.len()
            }

            /// True when the table holds no rows.
            pub fn is_empty(&self) -> bool {
                self.#rows_name.is_empty()
            }

            /// Iterate over rows in their original order.
            pub fn iter(&self) -> std::slice::Iter<'_, #name> {
                self.#rows_name.iter()
            }
        }

        impl<'a> IntoIterator for &'a #table_name {
            type Item = &'a #name;
            type IntoIter = std::slice::Iter<'a, #name>;

            fn into_iter(self) -> Self::IntoIter {
                self.#rows_name.iter()
            }
        }

        impl FromIterator<#name> for #table_name {
            fn from_iter<I: IntoIterator<Item = #name>>(iter: I) -> Self {
                Self::new(iter.into_iter().collect())
            }
        }

        impl caloview::Record for #name {
            type Table = #table_name;

            const FIELD_NAMES: &'static [&'static str] = &[#(#field_names),*];

            fn inspect_fields(&self) -> Vec<(&'static str, String)> {
                vec![
                    #(#inspect_entries),*
                ]
            }
        }

        impl caloview::Table for #table_name {
            type Row = #name;

            fn from_rows(rows: Vec<#name>) -> Self {
                Self::new(rows)
            }

            fn rows(&self) -> &[#name] {
                &self.#rows_name
            }
        }
    };

    TokenStream::from(expanded)
}

/// Options read from the struct-level `#[record(...)]` attribute.
#[derive(Default)]
struct StructOptions {
    table: Option<String>,
    rows: Option<String>,
}

fn parse_struct_options(attrs: &[Attribute]) -> StructOptions {
    let mut options = StructOptions::default();

    for attr in attrs {
        if !attr.path().is_ident("record") {
            continue;
        }
        let result = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                let value: LitStr = meta.value()?.parse()?;
                options.table = Some(value.value());
                Ok(())
            } else if meta.path.is_ident("rows") {
                let value: LitStr = meta.value()?.parse()?;
                options.rows = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("expected `table` or `rows`"))
            }
        });
        if let Err(e) = result {
            panic!("Invalid #[record] attribute: {}", e);
        }
    }

    options
}

fn parse_field_unit(attrs: &[Attribute]) -> Option<String> {
    let mut unit = None;

    for attr in attrs {
        if !attr.path().is_ident("record") {
            continue;
        }
        let result = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("unit") {
                let value: LitStr = meta.value()?.parse()?;
                unit = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("expected `unit`"))
            }
        });
        if let Err(e) = result {
            panic!("Invalid #[record] field attribute: {}", e);
        }
    }

    unit
}

/// Generate code to format a field for inspection display.
///
/// Floats get fixed precision, integers print as-is, anything else falls
/// back to `Debug`.
fn generate_inspect_format(
    field_name: &Ident,
    ty: &Type,
    unit: Option<&str>,
) -> proc_macro2::TokenStream {
    let type_str = quote!(#ty).to_string().replace(' ', "");
    let suffix = unit.map(|u| format!(" {}", u)).unwrap_or_default();

    match type_str.as_str() {
        "f64" | "f32" => {
            quote! { format!("{:.4}{}", self.#field_name, #suffix) }
        }
        "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" | "u64" | "usize" | "isize" => {
            quote! { format!("{}{}", self.#field_name, #suffix) }
        }
        _ => {
            quote! { format!("{:?}{}", self.#field_name, #suffix) }
        }
    }
}
