//! String templates as hosts for text written in another language.
//!
//! A host exposes its decoded content through a [`TextEscaper`], which also
//! maps every decoded offset back to the literal's source text. Edited
//! content is written back with [`InjectionHost::update_text`].

mod escaper;
mod host;
mod update;

pub use escaper::{EscapeError, StringTemplateEscaper, TextEscaper};
pub use host::{Host, INJECTABLE_ENTRIES, InjectionHost, StringTemplateHost};
pub use update::UpdateError;
