//! Struct member extraction

use super::model::FieldDoc;
use super::signature::SignaturePrinter;
use crate::ast::{Field, FieldList};
use crate::source::FileId;

/// Turns the members of a struct into [`FieldDoc`]s
pub struct FieldExtractor;

impl FieldExtractor {
    /// One entry per declared member, in order.
    ///
    /// `A, B int` is a single entry named after its first name. Nested struct
    /// types are not flattened.
    pub fn extract(
        printer: &mut SignaturePrinter<'_>,
        file_id: FileId,
        owner: &str,
        fields: &FieldList,
    ) -> Vec<FieldDoc> {
        fields
            .fields
            .iter()
            .map(|field| {
                let name = Self::display_name(field);
                let ty = printer.type_expr(file_id, &field.ty, || format!("field {owner}.{name}"));
                FieldDoc {
                    ty,
                    tag: field.tag.clone().unwrap_or_default(),
                    doc: Self::doc(field),
                    name,
                }
            })
            .collect()
    }

    /// The explicit name, or the bare type name of an embedded member:
    /// `*pkg.Base[T]` is listed as `Base`
    pub fn display_name(field: &Field) -> String {
        if let Some(first) = field.names.first() {
            return first.name.clone();
        }
        field
            .ty
            .base_name()
            .map(|ident| ident.name.clone())
            .unwrap_or_default()
    }

    /// Leading doc comment, else the trailing one
    fn doc(field: &Field) -> String {
        field
            .doc
            .as_ref()
            .or(field.comment.as_ref())
            .map(|group| group.text().trim().to_string())
            .unwrap_or_default()
    }
}
