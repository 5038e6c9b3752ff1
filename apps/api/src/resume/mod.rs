// Résumé collaborators: raw text extraction from uploaded files and
// best-effort contact-detail extraction from that text. The session core only
// consumes the extracted text and the optional profile fields.

pub mod extract;
pub mod handlers;
pub mod profile;
