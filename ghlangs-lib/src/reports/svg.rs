use super::{LanguageShare, partition_by_threshold};
use crate::Result;
use core::fmt::Write;

/// Languages below this share are left off the card unless configured otherwise.
pub const DEFAULT_MIN_PERCENTAGE: f64 = 0.01;

pub const DEFAULT_TITLE: &str = "Languages Used (By File Size)";

const BASE_HEIGHT: usize = 80;
const ITEM_HEIGHT: usize = 21;
const CONTENT_INSET: usize = 34;
const ANIMATION_STEP_MS: usize = 150;

const STYLE: &str = "svg {
  font-family: -apple-system, BlinkMacSystemFont, Segoe UI, Helvetica, Arial, sans-serif, Apple Color Emoji, Segoe UI Emoji;
  font-size: 14px;
  line-height: 21px;
}

#background {
  width: calc(100% - 10px);
  height: calc(100% - 10px);
  fill: white;
  stroke: rgb(225, 228, 232);
  stroke-width: 1px;
  rx: 6px;
  ry: 6px;
}

#gh-dark-mode-only:target #background {
  fill: #0d1117;
  stroke-width: 0.5px;
}

h2 {
  margin-top: 0;
  margin-bottom: 0.75em;
  line-height: 24px;
  font-size: 16px;
  font-weight: 600;
  color: rgb(36, 41, 46);
  fill: rgb(36, 41, 46);
}

#gh-dark-mode-only:target h2 {
  color: #c9d1d9;
  fill: #c9d1d9;
}

ul {
  list-style: none;
  padding-left: 0;
  margin-top: 0;
  margin-bottom: 0;
}

li {
  display: inline-flex;
  font-size: 12px;
  margin-right: 2ch;
  align-items: center;
  flex-wrap: nowrap;
  transform: translateX(-500%);
  animation: slideIn 2s ease-in-out forwards;
}

@keyframes slideIn {
  to {
    transform: translateX(0);
  }
}

div.ellipsis {
  height: 100%;
  overflow: hidden;
  text-overflow: ellipsis;
}

.octicon {
  fill: rgb(88, 96, 105);
  margin-right: 0.5ch;
  vertical-align: top;
}

#gh-dark-mode-only:target .octicon {
  color: #8b949e;
  fill: #8b949e;
}

.progress {
  display: flex;
  height: 8px;
  overflow: hidden;
  background-color: rgb(225, 228, 232);
  border-radius: 6px;
  outline: 1px solid transparent;
  margin-bottom: 1em;
}

#gh-dark-mode-only:target .progress {
  background-color: rgba(110, 118, 129, 0.4);
}

.progress-item {
  outline: 2px solid rgb(225, 228, 232);
  border-collapse: collapse;
}

#gh-dark-mode-only:target .progress-item {
  outline: 2px solid #393f47;
}

.lang {
  font-weight: 600;
  margin-right: 4px;
  color: rgb(36, 41, 46);
}

#gh-dark-mode-only:target .lang {
  color: #c9d1d9;
}

.percent {
  color: rgb(88, 96, 105)
}

#gh-dark-mode-only:target .percent {
  color: #8b949e;
}
";

/// Presentation settings for the language card.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgOptions {
    pub title: String,
    pub min_percentage: f64,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            min_percentage: DEFAULT_MIN_PERCENTAGE,
        }
    }
}

/// Render the language card for `shares`, which must already be ranked.
pub fn generate<W: Write>(shares: &[LanguageShare], options: &SvgOptions, writer: &mut W) -> Result<()> {
    let (shown, _) = partition_by_threshold(shares, options.min_percentage);

    let height = BASE_HEIGHT + shown.len() * ITEM_HEIGHT;
    let content_height = height - CONTENT_INSET;

    writeln!(writer, r#"<svg id="gh-dark-mode-only" width="360" height="{height}" xmlns="http://www.w3.org/2000/svg">"#)?;
    writeln!(writer, "<style>")?;
    write!(writer, "{STYLE}")?;
    writeln!(writer)?;
    writeln!(writer, "foreignObject {{")?;
    writeln!(writer, "  width: calc(100% - 10px - 32px);")?;
    writeln!(writer, "  height: {content_height}px;")?;
    writeln!(writer, "}}")?;
    writeln!(writer, "</style>")?;
    writeln!(writer, "<g>")?;
    writeln!(writer, r#"<rect x="5" y="5" id="background" />"#)?;
    writeln!(writer, "<g>")?;
    writeln!(writer, r#"<foreignObject x="21" y="17" width="318" height="{content_height}">"#)?;
    writeln!(writer, r#"<div xmlns="http://www.w3.org/1999/xhtml" class="ellipsis">"#)?;
    writeln!(writer)?;
    writeln!(writer, "<h2>{}</h2>", xml_escape(&options.title))?;
    writeln!(writer)?;
    writeln!(writer, "<div>")?;
    writeln!(writer, r#"<span class="progress">"#)?;
    for share in &shown {
        write!(
            writer,
            r#"<span style="background-color: {};width: {:.3}%;" class="progress-item"></span>"#,
            xml_escape(&share.color),
            share.percentage
        )?;
    }
    writeln!(writer)?;
    writeln!(writer, "</span>")?;
    writeln!(writer, "</div>")?;
    writeln!(writer)?;
    write!(writer, "<ul>")?;
    for (index, share) in shown.iter().enumerate() {
        write_legend_item(writer, index, share)?;
    }
    writeln!(writer)?;
    writeln!(writer, "</ul>")?;
    writeln!(writer)?;
    writeln!(writer, "</div>")?;
    writeln!(writer, "</foreignObject>")?;
    writeln!(writer, "</g>")?;
    writeln!(writer, "</g>")?;
    writeln!(writer, "</svg>")?;

    Ok(())
}

fn write_legend_item<W: Write>(writer: &mut W, index: usize, share: &LanguageShare) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer)?;
    writeln!(writer, r#"<li style="animation-delay: {}ms;">"#, index * ANIMATION_STEP_MS)?;
    writeln!(
        writer,
        r#"<svg xmlns="http://www.w3.org/2000/svg" class="octicon" style="fill:{};""#,
        xml_escape(&share.color)
    )?;
    writeln!(writer, r#"viewBox="0 0 16 16" version="1.1" width="16" height="16"><path"#)?;
    writeln!(writer, r#"fill-rule="evenodd" d="M8 4a4 4 0 100 8 4 4 0 000-8z"></path></svg>"#)?;
    writeln!(writer, r#"<span class="lang">{}</span>"#, xml_escape(&share.name))?;
    writeln!(writer, r#"<span class="percent">{:.2}%</span>"#, share.percentage)?;
    write!(writer, "</li>")?;
    Ok(())
}

fn xml_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            _ => result.push(c),
        }
    }
    result
}
