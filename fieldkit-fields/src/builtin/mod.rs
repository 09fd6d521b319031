//! The built-in field types.

mod choice;
mod container;
mod content;
mod input;
mod markup;

pub use choice::{CheckboxField, ChoiceField, ChoiceKind};
pub use container::{GroupField, MetaboxField, RepeaterField, Tab, TabsField};
pub use content::{CustomHtmlField, TextareaField, UploadField, WysiwygField};
pub use input::{InputField, InputKind};

use crate::error::Result;
use crate::field::FieldInstance;
use crate::types::FieldConfig;

/// Constructor signature shared by every built-in type.
pub type BuiltinConstructor = fn(FieldConfig) -> Result<FieldInstance>;

/// Every built-in type tag with its constructor, in registration order.
pub fn builtin_types() -> Vec<(&'static str, BuiltinConstructor)> {
    let types: [(&'static str, BuiltinConstructor); 18] = [
        ("text", InputField::text),
        ("password", InputField::password),
        ("email", InputField::email),
        ("url", InputField::url),
        ("number", InputField::number),
        ("date", InputField::date),
        ("color", InputField::color),
        ("textarea", TextareaField::construct),
        ("wysiwyg", WysiwygField::construct),
        ("select", ChoiceField::select),
        ("radio", ChoiceField::radio),
        ("checkbox", CheckboxField::construct),
        ("upload", UploadField::construct),
        ("custom_html", CustomHtmlField::construct),
        ("group", GroupField::construct),
        ("metabox", MetaboxField::construct),
        ("tabs", TabsField::construct),
        ("repeater", RepeaterField::construct),
    ];
    types.to_vec()
}
