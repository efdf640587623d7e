//! Markdown 描画（pulldown-cmark）
//!
//! TerminalMarkdownRenderer: イベントを辿って端末向けのプレーンテキストにする
//! HtmlMarkdownRenderer: /html 書き出し用

use crate::ports::outbound::MarkdownRenderer;
use common::error::Error;
use pulldown_cmark::{html, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

const RULE: &str = "────────────────────────────────────────";

fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalMarkdownRenderer;

impl TerminalMarkdownRenderer {
    pub fn new() -> Self {
        Self
    }
}

/// 行頭でなければ改行する
fn ensure_line_start(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

/// 直前に空行を置く（先頭では何もしない）
fn ensure_blank_line(out: &mut String) {
    ensure_line_start(out);
    if !out.is_empty() && !out.ends_with("\n\n") {
        out.push('\n');
    }
}

impl MarkdownRenderer for TerminalMarkdownRenderer {
    fn render(&self, markdown: &str) -> Result<String, Error> {
        let mut out = String::new();
        // 入れ子のリスト。Some(n) は番号付きで次の番号。
        let mut lists: Vec<Option<u64>> = Vec::new();
        let mut links: Vec<String> = Vec::new();
        let mut heading_start = 0;
        let mut in_code = false;

        for event in Parser::new_ext(markdown, parser_options()) {
            match event {
                Event::Start(Tag::Heading { .. }) => {
                    ensure_blank_line(&mut out);
                    heading_start = out.len();
                }
                Event::End(TagEnd::Heading(level)) => {
                    let width = out[heading_start..].chars().count();
                    let underline = match level {
                        HeadingLevel::H1 => Some('='),
                        HeadingLevel::H2 => Some('-'),
                        _ => None,
                    };
                    if let Some(ch) = underline {
                        out.push('\n');
                        out.extend(std::iter::repeat(ch).take(width));
                    }
                    out.push('\n');
                }
                Event::Start(Tag::Paragraph) => {
                    if lists.is_empty() {
                        ensure_blank_line(&mut out);
                    }
                }
                Event::End(TagEnd::Paragraph) => ensure_line_start(&mut out),
                Event::Start(Tag::List(start)) => {
                    if lists.is_empty() {
                        ensure_blank_line(&mut out);
                    }
                    lists.push(start);
                }
                Event::End(TagEnd::List(_)) => {
                    lists.pop();
                    ensure_line_start(&mut out);
                }
                Event::Start(Tag::Item) => {
                    ensure_line_start(&mut out);
                    let depth = lists.len().saturating_sub(1);
                    out.push_str(&"  ".repeat(depth));
                    match lists.last_mut() {
                        Some(Some(n)) => {
                            out.push_str(&format!("{}. ", n));
                            *n += 1;
                        }
                        _ => out.push_str("• "),
                    }
                }
                Event::End(TagEnd::Item) => ensure_line_start(&mut out),
                Event::TaskListMarker(done) => out.push_str(if done { "[x] " } else { "[ ] " }),
                Event::Start(Tag::CodeBlock(_)) => {
                    ensure_blank_line(&mut out);
                    in_code = true;
                }
                Event::End(TagEnd::CodeBlock) => {
                    in_code = false;
                    ensure_line_start(&mut out);
                }
                Event::Start(Tag::Link { dest_url, .. }) => links.push(dest_url.to_string()),
                Event::End(TagEnd::Link) => {
                    if let Some(url) = links.pop().filter(|u| !u.is_empty()) {
                        out.push_str(&format!(" ({})", url));
                    }
                }
                Event::Start(Tag::Image { dest_url, .. }) => {
                    out.push_str("[image: ");
                    links.push(dest_url.to_string());
                }
                Event::End(TagEnd::Image) => {
                    let url = links.pop().unwrap_or_default();
                    out.push_str(&format!("] {}", url));
                }
                Event::End(TagEnd::TableCell) => out.push_str(" | "),
                Event::Start(Tag::TableRow) | Event::Start(Tag::TableHead) => {
                    ensure_line_start(&mut out);
                    out.push_str("| ");
                }
                Event::End(TagEnd::TableHead) => {
                    let width = out.lines().last().map(|l| l.chars().count()).unwrap_or(0);
                    out.push('\n');
                    out.extend(std::iter::repeat('-').take(width.saturating_sub(1)));
                    out.push('\n');
                }
                Event::End(TagEnd::TableRow) => {
                    let trimmed = out.trim_end().len();
                    out.truncate(trimmed);
                    out.push('\n');
                }
                Event::Start(Tag::Table(_)) => ensure_blank_line(&mut out),
                Event::Text(text) => {
                    if in_code {
                        for line in text.lines() {
                            out.push_str("    ");
                            out.push_str(line);
                            out.push('\n');
                        }
                    } else {
                        out.push_str(&text);
                    }
                }
                Event::Code(code) => {
                    out.push('`');
                    out.push_str(&code);
                    out.push('`');
                }
                Event::Html(raw) | Event::InlineHtml(raw) => out.push_str(&raw),
                Event::SoftBreak => out.push(' '),
                Event::HardBreak => out.push('\n'),
                Event::Rule => {
                    ensure_blank_line(&mut out);
                    out.push_str(RULE);
                    out.push('\n');
                }
                _ => {}
            }
        }
        Ok(out.trim_end().to_string())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlMarkdownRenderer;

impl HtmlMarkdownRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl MarkdownRenderer for HtmlMarkdownRenderer {
    fn render(&self, markdown: &str) -> Result<String, Error> {
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, Parser::new_ext(markdown, parser_options()));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_headings_and_lists() {
        let md = "# Project Phoenix\n\nGoals for Q3.\n\n## Scope\n\n- API\n- UI\n\n1. plan\n2. ship\n";
        let out = TerminalMarkdownRenderer::new().render(md).unwrap();
        assert!(out.starts_with("Project Phoenix\n===============\n"));
        assert!(out.contains("Scope\n-----"));
        assert!(out.contains("• API\n• UI"));
        assert!(out.contains("1. plan\n2. ship"));
        assert!(!out.contains('#'));
    }

    #[test]
    fn test_terminal_inline_and_code() {
        let md = "Use **bold** and `code` with [docs](https://example.com).\n\n```\nlet x = 1;\n```\n";
        let out = TerminalMarkdownRenderer::new().render(md).unwrap();
        assert!(out.contains("Use bold and `code` with docs (https://example.com)."));
        assert!(out.contains("    let x = 1;"));
    }

    #[test]
    fn test_html_export() {
        let out = HtmlMarkdownRenderer::new().render("# Title\n\n*x*").unwrap();
        assert!(out.contains("<h1>Title</h1>"));
        assert!(out.contains("<em>x</em>"));
    }
}
