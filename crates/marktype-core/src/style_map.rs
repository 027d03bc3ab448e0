//! How style tags and block types are drawn.
//!
//! The presentation layer asks this map for a [`Treatment`] instead of
//! hard-coding looks per tag. Only `RED_TEXT` declares something beyond the
//! conventional look; the code-block background mirrors a light `<pre>`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use marktype_doc::{BlockType, StyleTag};

/// Color representation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Builds a color from a `0xRRGGBB` value.
    pub const fn hex(value: u32) -> Self {
        Self::rgb(
            ((value >> 16) & 0xff) as f32 / 255.0,
            ((value >> 8) & 0xff) as f32 / 255.0,
            (value & 0xff) as f32 / 255.0,
        )
    }

    /// ANSI 24-bit foreground escape for terminal previews.
    pub fn ansi_fg(&self) -> String {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("\x1b[38;2;{};{};{}m", c(self.r), c(self.g), c(self.b))
    }
}

/// Rendering treatment for an inline style or a block type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Treatment {
    pub foreground: Option<Color>,
    pub background: Option<Color>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub monospace: bool,
    /// Font size multiplier (1.0 = body text)
    pub font_scale: f32,
    pub padding: f32,
    pub corner_radius: f32,
}

impl Treatment {
    fn body() -> Self {
        Self {
            font_scale: 1.0,
            ..Default::default()
        }
    }
}

/// Lookup table from tags to treatments.
#[derive(Debug, Clone)]
pub struct StyleMap {
    inline: HashMap<StyleTag, Treatment>,
    blocks: HashMap<BlockType, Treatment>,
}

impl StyleMap {
    /// Treatment for an inline style.
    pub fn inline(&self, tag: StyleTag) -> &Treatment {
        &self.inline[&tag]
    }

    /// Treatment for a block type.
    pub fn block(&self, block_type: BlockType) -> &Treatment {
        &self.blocks[&block_type]
    }

    /// Merges inline treatments in order, later ones winning.
    pub fn combine<'a>(&self, tags: impl IntoIterator<Item = &'a StyleTag>) -> Treatment {
        tags.into_iter().fold(Treatment::body(), |mut acc, tag| {
            let t = self.inline(*tag);
            acc.foreground = t.foreground.or(acc.foreground);
            acc.background = t.background.or(acc.background);
            acc.bold |= t.bold;
            acc.italic |= t.italic;
            acc.underline |= t.underline;
            acc.monospace |= t.monospace;
            acc
        })
    }
}

impl Default for StyleMap {
    fn default() -> Self {
        // Every tag gets an entry so lookups are total.
        let inline = StyleTag::ALL
            .into_iter()
            .map(|tag| {
                let treatment = match tag {
                    StyleTag::Bold => Treatment {
                        bold: true,
                        ..Treatment::body()
                    },
                    StyleTag::Italic => Treatment {
                        italic: true,
                        ..Treatment::body()
                    },
                    StyleTag::Underline => Treatment {
                        underline: true,
                        ..Treatment::body()
                    },
                    StyleTag::RedText => Treatment {
                        foreground: Some(Color::RED),
                        ..Treatment::body()
                    },
                };
                (tag, treatment)
            })
            .collect();

        let blocks = BlockType::ALL
            .into_iter()
            .map(|block_type| {
                let treatment = match block_type {
                    BlockType::Unstyled => Treatment::body(),
                    BlockType::HeaderOne => Treatment {
                        bold: true,
                        font_scale: 2.0,
                        ..Treatment::body()
                    },
                    BlockType::HeaderTwo => Treatment {
                        bold: true,
                        font_scale: 1.5,
                        ..Treatment::body()
                    },
                    BlockType::Blockquote => Treatment {
                        italic: true,
                        foreground: Some(Color::hex(0x646e7f)),
                        padding: 10.0,
                        ..Treatment::body()
                    },
                    BlockType::CodeBlock => Treatment {
                        monospace: true,
                        background: Some(Color::hex(0xf5f5f5)),
                        padding: 10.0,
                        corner_radius: 4.0,
                        ..Treatment::body()
                    },
                };
                (block_type, treatment)
            })
            .collect();

        Self { inline, blocks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_red_text_is_red() {
        let map = StyleMap::default();
        assert_eq!(map.inline(StyleTag::RedText).foreground, Some(Color::RED));
        assert!(map.inline(StyleTag::Bold).foreground.is_none());
    }

    #[test]
    fn test_every_tag_has_a_treatment() {
        let map = StyleMap::default();
        for tag in StyleTag::ALL {
            assert_eq!(map.inline(tag).font_scale, 1.0);
        }
        for block_type in BlockType::ALL {
            assert!(map.block(block_type).font_scale >= 1.0);
        }
    }

    #[test]
    fn test_code_block_background() {
        let map = StyleMap::default();
        let code = map.block(BlockType::CodeBlock);
        assert!(code.monospace);
        assert_eq!(code.background, Some(Color::hex(0xf5f5f5)));
        assert_eq!(code.corner_radius, 4.0);
    }

    #[test]
    fn test_combine_merges_flags() {
        let map = StyleMap::default();
        let t = map.combine(&[StyleTag::Bold, StyleTag::RedText]);
        assert!(t.bold);
        assert_eq!(t.foreground, Some(Color::RED));
        assert!(!t.underline);
    }

    #[test]
    fn test_ansi_escape() {
        assert_eq!(Color::RED.ansi_fg(), "\x1b[38;2;255;0;0m");
    }
}
