use pulldown_cmark::{Options, Parser};

/// Renders a Markdown document to an HTML fragment.
pub fn to_html(md: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(md, options);
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_headings_code_and_tables() {
        let html = to_html("# Setup\n\n```xml\n<t t-name=\"x\"/>\n```\n\n| a | b |\n|---|---|\n| 1 | 2 |\n");

        assert!(html.contains("<h1>Setup</h1>"));
        assert!(html.contains("<code class=\"language-xml\">&lt;t t-name="));
        assert!(html.contains("<table>"));
    }
}
