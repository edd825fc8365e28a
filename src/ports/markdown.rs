/// MarkdownConverter defines the port (interface) for turning Reddit-flavored
/// markdown into gemtext.
///
/// Implementations must emit link targets as a separate block of `=> ` lines
/// after each paragraph rather than inline; the gemtext renderer in the core
/// relies on that shape when rewriting links. The conversion is a pure
/// function of its input.
pub trait MarkdownConverter: Send + Sync {
    /// Convert markdown text to gemtext.
    fn to_gemtext(&self, markdown: &str) -> String;
}
