/// Unsigned/signed/real primitives and their tagged forms.
pub mod primitives;
/// Borrowing cursor over a received frame.
pub mod reader;
/// Application, context and opening/closing tags.
pub mod tag;
/// Cursor writing into a caller-owned buffer.
pub mod writer;
