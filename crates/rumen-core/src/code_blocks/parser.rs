//! Parser for extracting code blocks from markdown text.

use super::{CodeBlock, CodeBlockError, Result};

const FENCE: &str = "```";

/// Parser for extracting code blocks from markdown text.
pub struct CodeBlockParser;

impl CodeBlockParser {
    /// Parses markdown text and extracts all code blocks.
    ///
    /// The opening fence runs to the end of its line and may carry a language tag.
    /// The block ends at the next fence, wherever it sits on a line. A block whose
    /// closing fence is missing runs to the end of the text and is still returned.
    pub fn parse(markdown: &str) -> Vec<CodeBlock> {
        let mut blocks = Vec::new();
        let mut rest = markdown;

        while let Some(open) = rest.find(FENCE) {
            let offset = markdown.len() - rest.len() + open;
            let start_line = markdown[..offset].matches('\n').count() + 1;

            let after_fence = &rest[open + FENCE.len()..];
            let (info, body) = match after_fence.find('\n') {
                Some(nl) => (&after_fence[..nl], &after_fence[nl + 1..]),
                None => (after_fence, ""),
            };

            let (content, remainder) = match body.find(FENCE) {
                Some(close) => (&body[..close], &body[close + FENCE.len()..]),
                None => (body, ""),
            };

            blocks.push(CodeBlock {
                index: blocks.len() + 1,
                language: Self::extract_language(info),
                content: content.trim_end().to_string(),
                start_line,
            });
            rest = remainder;
        }

        blocks
    }

    /// Language tag from the text following an opening fence.
    ///
    /// Only the first word counts, so "```bash title=job" yields `bash`.
    pub fn extract_language(info: &str) -> Option<String> {
        info.split_whitespace().next().map(str::to_string)
    }

    /// First block tagged with `language` (case-insensitive).
    pub fn first_with_language(markdown: &str, language: &str) -> Option<CodeBlock> {
        Self::parse(markdown).into_iter().find(|block| block.is_language(language))
    }

    /// Like [`Self::first_with_language`] but reports a missing block as an error.
    pub fn require_language(markdown: &str, language: &str) -> Result<CodeBlock> {
        Self::first_with_language(markdown, language)
            .ok_or_else(|| CodeBlockError::NotFound(language.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_block() {
        let markdown = r#"Here's the job:

```bash
#!/bin/bash
#SBATCH -p batch
wget -c "$url"
```

Submit with sbatch."#;

        let blocks = CodeBlockParser::parse(markdown);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].index, 1);
        assert_eq!(blocks[0].start_line, 3);
        assert_eq!(blocks[0].language, Some("bash".to_string()));
        assert_eq!(blocks[0].content, "#!/bin/bash\n#SBATCH -p batch\nwget -c \"$url\"");
    }

    #[test]
    fn test_parse_multiple_blocks() {
        let markdown = "First:\n\n```python\nimport csv\n```\n\nThen:\n\n```\nplain\n```\n\n```R\nlibrary(vegan)\n```";

        let blocks = CodeBlockParser::parse(markdown);
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].language.as_deref(), Some("python"));
        assert_eq!(blocks[1].index, 2);
        assert_eq!(blocks[1].language, None);
        assert_eq!(blocks[1].content, "plain");
        assert_eq!(blocks[2].index, 3);
        assert_eq!(blocks[2].language.as_deref(), Some("R"));
    }

    #[test]
    fn test_closing_fence_on_content_line() {
        let blocks = CodeBlockParser::parse("```bash\necho one```\ntext after");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].content, "echo one");
    }

    #[test]
    fn test_parse_empty_response() {
        assert!(CodeBlockParser::parse("No code blocks here.").is_empty());
    }

    #[test]
    fn test_parse_unterminated_block() {
        let blocks = CodeBlockParser::parse("Script:\n\n```bash\necho start\n# cut off");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].content, "echo start\n# cut off");
    }

    #[test]
    fn test_extract_language() {
        assert_eq!(CodeBlockParser::extract_language("bash"), Some("bash".to_string()));
        assert_eq!(CodeBlockParser::extract_language(" python  extra"), Some("python".to_string()));
        assert_eq!(CodeBlockParser::extract_language(""), None);
        assert_eq!(CodeBlockParser::extract_language("   "), None);
    }

    #[test]
    fn test_first_with_language() {
        let markdown = "```text\nnotes\n```\n```Python\nprint(1)\n```\n```python\nprint(2)\n```";

        let block = CodeBlockParser::first_with_language(markdown, "python").unwrap();
        assert_eq!(block.index, 2);
        assert_eq!(block.content, "print(1)");
        assert!(CodeBlockParser::first_with_language(markdown, "bash").is_none());
    }

    #[test]
    fn test_require_language_missing() {
        let err = CodeBlockParser::require_language("no fences", "bash").unwrap_err();
        assert!(matches!(err, CodeBlockError::NotFound(ref l) if l == "bash"));
        assert!(err.to_string().contains("```bash"));
    }
}
