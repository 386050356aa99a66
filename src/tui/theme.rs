//! Color themes.

use crate::config::{ColorValue, CustomThemeConfig};
use ratatui::style::{Color, Modifier, Style};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString)]
pub enum ThemeName {
    #[default]
    OceanDark,
    Nord,
    Dracula,
    Gruvbox,
}

impl ThemeName {
    /// The theme after this one, wrapping around.
    pub fn next(self) -> Self {
        let all: Vec<ThemeName> = ThemeName::iter().collect();
        let idx = all.iter().position(|&t| t == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: ThemeName,
    pub background: Color,
    pub foreground: Color,
    pub headings: [Color; 3],
    pub border_focused: Color,
    pub border_unfocused: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub inline_code_fg: Color,
    pub inline_code_bg: Color,
    pub code_fg: Color,
    pub bold_fg: Color,
    pub italic_fg: Color,
    pub link_fg: Color,
    pub list_bullet: Color,
    pub blockquote_border: Color,
    pub blockquote_fg: Color,
    pub table_border: Color,
    pub title_bar_fg: Color,
    pub dim_fg: Color,
    pub search_match_bg: Color,
    pub search_match_fg: Color,
    pub search_current_bg: Color,
    pub search_current_fg: Color,
}

impl Theme {
    pub fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::OceanDark => Self::ocean_dark(),
            ThemeName::Nord => Self::nord(),
            ThemeName::Dracula => Self::dracula(),
            ThemeName::Gruvbox => Self::gruvbox(),
        }
    }

    fn ocean_dark() -> Self {
        Self {
            name: ThemeName::OceanDark,
            background: Color::Rgb(22, 27, 34),
            foreground: Color::Rgb(201, 209, 217),
            headings: [
                Color::Rgb(121, 192, 255),
                Color::Rgb(126, 231, 135),
                Color::Rgb(255, 166, 87),
            ],
            border_focused: Color::Rgb(88, 166, 255),
            border_unfocused: Color::Rgb(48, 54, 61),
            selection_bg: Color::Rgb(33, 58, 94),
            selection_fg: Color::Rgb(230, 237, 243),
            status_bar_bg: Color::Rgb(33, 38, 45),
            status_bar_fg: Color::Rgb(201, 209, 217),
            inline_code_fg: Color::Rgb(255, 123, 114),
            inline_code_bg: Color::Rgb(40, 46, 54),
            code_fg: Color::Rgb(165, 214, 255),
            bold_fg: Color::Rgb(240, 246, 252),
            italic_fg: Color::Rgb(210, 168, 255),
            link_fg: Color::Rgb(88, 166, 255),
            list_bullet: Color::Rgb(121, 192, 255),
            blockquote_border: Color::Rgb(61, 68, 77),
            blockquote_fg: Color::Rgb(139, 148, 158),
            table_border: Color::Rgb(61, 68, 77),
            title_bar_fg: Color::Rgb(121, 192, 255),
            dim_fg: Color::Rgb(110, 118, 129),
            search_match_bg: Color::Rgb(187, 128, 9),
            search_match_fg: Color::Rgb(13, 17, 23),
            search_current_bg: Color::Rgb(255, 166, 87),
            search_current_fg: Color::Rgb(13, 17, 23),
        }
    }

    fn nord() -> Self {
        Self {
            name: ThemeName::Nord,
            background: Color::Rgb(46, 52, 64),
            foreground: Color::Rgb(216, 222, 233),
            headings: [
                Color::Rgb(136, 192, 208),
                Color::Rgb(129, 161, 193),
                Color::Rgb(163, 190, 140),
            ],
            border_focused: Color::Rgb(136, 192, 208),
            border_unfocused: Color::Rgb(76, 86, 106),
            selection_bg: Color::Rgb(67, 76, 94),
            selection_fg: Color::Rgb(236, 239, 244),
            status_bar_bg: Color::Rgb(59, 66, 82),
            status_bar_fg: Color::Rgb(216, 222, 233),
            inline_code_fg: Color::Rgb(208, 135, 112),
            inline_code_bg: Color::Rgb(59, 66, 82),
            code_fg: Color::Rgb(143, 188, 187),
            bold_fg: Color::Rgb(236, 239, 244),
            italic_fg: Color::Rgb(180, 142, 173),
            link_fg: Color::Rgb(94, 129, 172),
            list_bullet: Color::Rgb(136, 192, 208),
            blockquote_border: Color::Rgb(76, 86, 106),
            blockquote_fg: Color::Rgb(158, 168, 187),
            table_border: Color::Rgb(76, 86, 106),
            title_bar_fg: Color::Rgb(136, 192, 208),
            dim_fg: Color::Rgb(97, 110, 136),
            search_match_bg: Color::Rgb(235, 203, 139),
            search_match_fg: Color::Rgb(46, 52, 64),
            search_current_bg: Color::Rgb(208, 135, 112),
            search_current_fg: Color::Rgb(46, 52, 64),
        }
    }

    fn dracula() -> Self {
        Self {
            name: ThemeName::Dracula,
            background: Color::Rgb(40, 42, 54),
            foreground: Color::Rgb(248, 248, 242),
            headings: [
                Color::Rgb(189, 147, 249),
                Color::Rgb(255, 121, 198),
                Color::Rgb(139, 233, 253),
            ],
            border_focused: Color::Rgb(189, 147, 249),
            border_unfocused: Color::Rgb(68, 71, 90),
            selection_bg: Color::Rgb(68, 71, 90),
            selection_fg: Color::Rgb(248, 248, 242),
            status_bar_bg: Color::Rgb(68, 71, 90),
            status_bar_fg: Color::Rgb(248, 248, 242),
            inline_code_fg: Color::Rgb(80, 250, 123),
            inline_code_bg: Color::Rgb(52, 55, 70),
            code_fg: Color::Rgb(241, 250, 140),
            bold_fg: Color::Rgb(255, 184, 108),
            italic_fg: Color::Rgb(241, 250, 140),
            link_fg: Color::Rgb(139, 233, 253),
            list_bullet: Color::Rgb(255, 121, 198),
            blockquote_border: Color::Rgb(98, 114, 164),
            blockquote_fg: Color::Rgb(98, 114, 164),
            table_border: Color::Rgb(98, 114, 164),
            title_bar_fg: Color::Rgb(189, 147, 249),
            dim_fg: Color::Rgb(98, 114, 164),
            search_match_bg: Color::Rgb(241, 250, 140),
            search_match_fg: Color::Rgb(40, 42, 54),
            search_current_bg: Color::Rgb(255, 184, 108),
            search_current_fg: Color::Rgb(40, 42, 54),
        }
    }

    fn gruvbox() -> Self {
        Self {
            name: ThemeName::Gruvbox,
            background: Color::Rgb(40, 40, 40),
            foreground: Color::Rgb(235, 219, 178),
            headings: [
                Color::Rgb(250, 189, 47),
                Color::Rgb(184, 187, 38),
                Color::Rgb(131, 165, 152),
            ],
            border_focused: Color::Rgb(250, 189, 47),
            border_unfocused: Color::Rgb(80, 73, 69),
            selection_bg: Color::Rgb(80, 73, 69),
            selection_fg: Color::Rgb(251, 241, 199),
            status_bar_bg: Color::Rgb(60, 56, 54),
            status_bar_fg: Color::Rgb(235, 219, 178),
            inline_code_fg: Color::Rgb(254, 128, 25),
            inline_code_bg: Color::Rgb(60, 56, 54),
            code_fg: Color::Rgb(142, 192, 124),
            bold_fg: Color::Rgb(251, 241, 199),
            italic_fg: Color::Rgb(211, 134, 155),
            link_fg: Color::Rgb(131, 165, 152),
            list_bullet: Color::Rgb(254, 128, 25),
            blockquote_border: Color::Rgb(102, 92, 84),
            blockquote_fg: Color::Rgb(168, 153, 132),
            table_border: Color::Rgb(102, 92, 84),
            title_bar_fg: Color::Rgb(250, 189, 47),
            dim_fg: Color::Rgb(146, 131, 116),
            search_match_bg: Color::Rgb(215, 153, 33),
            search_match_fg: Color::Rgb(40, 40, 40),
            search_current_bg: Color::Rgb(254, 128, 25),
            search_current_fg: Color::Rgb(40, 40, 40),
        }
    }

    /// Apply user overrides from the `[theme]` config section.
    pub fn with_custom_colors(mut self, custom: &CustomThemeConfig) -> Self {
        fn apply(target: &mut Color, value: &Option<ColorValue>) {
            if let Some(color) = value.as_ref().and_then(ColorValue::to_color) {
                *target = color;
            }
        }

        apply(&mut self.background, &custom.background);
        apply(&mut self.foreground, &custom.foreground);
        apply(&mut self.headings[0], &custom.heading_1);
        apply(&mut self.headings[1], &custom.heading_2);
        apply(&mut self.headings[2], &custom.heading_3);
        apply(&mut self.border_focused, &custom.border_focused);
        apply(&mut self.border_unfocused, &custom.border_unfocused);
        apply(&mut self.selection_bg, &custom.selection_bg);
        apply(&mut self.selection_fg, &custom.selection_fg);
        apply(&mut self.status_bar_bg, &custom.status_bar_bg);
        apply(&mut self.status_bar_fg, &custom.status_bar_fg);
        apply(&mut self.inline_code_fg, &custom.inline_code_fg);
        apply(&mut self.link_fg, &custom.link_fg);
        apply(&mut self.search_match_bg, &custom.search_match_bg);
        apply(&mut self.search_match_fg, &custom.search_match_fg);
        apply(&mut self.search_current_bg, &custom.search_current_bg);
        apply(&mut self.search_current_fg, &custom.search_current_fg);
        self
    }

    pub fn heading_color(&self, level: u8) -> Color {
        match level {
            1 => self.headings[0],
            2 => self.headings[1],
            _ => self.headings[2],
        }
    }

    pub fn heading_style(&self, level: u8) -> Style {
        let style = Style::default()
            .fg(self.heading_color(level))
            .add_modifier(Modifier::BOLD);
        if level == 1 {
            style.add_modifier(Modifier::UNDERLINED)
        } else {
            style
        }
    }

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.foreground)
    }

    pub fn content_style(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn bold_style(&self) -> Style {
        Style::default()
            .fg(self.bold_fg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn italic_style(&self) -> Style {
        Style::default()
            .fg(self.italic_fg)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn strikethrough_style(&self) -> Style {
        Style::default()
            .fg(self.dim_fg)
            .add_modifier(Modifier::CROSSED_OUT)
    }

    pub fn inline_code_style(&self) -> Style {
        Style::default()
            .fg(self.inline_code_fg)
            .bg(self.inline_code_bg)
    }

    pub fn code_style(&self) -> Style {
        Style::default().fg(self.code_fg)
    }

    pub fn code_fence_style(&self) -> Style {
        Style::default().fg(self.dim_fg)
    }

    pub fn link_style(&self) -> Style {
        Style::default()
            .fg(self.link_fg)
            .add_modifier(Modifier::UNDERLINED)
    }

    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.dim_fg)
    }

    pub fn border_style(&self, focused: bool) -> Style {
        let color = if focused {
            self.border_focused
        } else {
            self.border_unfocused
        };
        Style::default().fg(color)
    }

    pub fn selection_style(&self) -> Style {
        Style::default()
            .fg(self.selection_fg)
            .bg(self.selection_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style(&self) -> Style {
        Style::default()
            .fg(self.status_bar_fg)
            .bg(self.status_bar_bg)
    }

    pub fn search_match_style(&self) -> Style {
        Style::default()
            .fg(self.search_match_fg)
            .bg(self.search_match_bg)
    }

    pub fn search_current_style(&self) -> Style {
        Style::default()
            .fg(self.search_current_fg)
            .bg(self.search_current_bg)
            .add_modifier(Modifier::BOLD)
    }

    // Modal colors follow the main palette.
    pub fn modal_bg(&self) -> Color {
        self.status_bar_bg
    }

    pub fn modal_border(&self) -> Color {
        self.border_focused
    }

    pub fn modal_title(&self) -> Color {
        self.title_bar_fg
    }

    pub fn modal_text(&self) -> Color {
        self.foreground
    }

    pub fn modal_description(&self) -> Color {
        self.dim_fg
    }

    pub fn modal_key_fg(&self) -> Color {
        self.headings[1]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_name(ThemeName::default())
    }
}
