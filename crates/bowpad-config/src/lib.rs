mod cascade;
pub mod color;
pub mod file_types;
pub mod ini;
pub mod language;
pub mod lex_styles;
pub mod lexer;
pub mod path_overrides;
mod resolver;
pub mod settings;
pub mod source;
pub mod style;
mod user_data;
mod values;

pub use color::Rgb;
pub use file_types::FileType;
pub use ini::IniDocument;
pub use language::{DetectionAnchor, DetectionRule, LanguageProfile};
pub use lex_styles::{DefaultExtension, LexStyles};
pub use lexer::{LexerId, LexerProfile, UserLexerOverlay};
pub use path_overrides::PathOverrides;
pub use resolver::FALLBACK_LANGUAGE;
pub use settings::{resolve_data_dir, CascadeSettings, DEFAULT_LEXSTYLES};
pub use source::{discover_sources, ConfigSource, SourceOrigin};
pub use style::{FontStyle, StyleEntry, StyleIndex};
