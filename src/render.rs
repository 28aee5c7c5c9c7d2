//! Plain-text rendering of characters and pages for the terminal.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::fmt::Write as _;

use crate::api::{Character, CharacterId, CharacterPage};

const FAVORITE_MARK: char = '*';

/// One list row: favorite mark, id, name, status and species.
#[must_use]
pub fn character_line(character: &Character, favorite: bool) -> String {
    let mark = if favorite { FAVORITE_MARK } else { ' ' };
    format!(
        "{mark} {:>4}  {} ({}, {})",
        character.id,
        character.name,
        character.status.as_str(),
        character.species
    )
}

/// Position line plus `--page` hints for whichever neighbours exist.
#[must_use]
pub fn page_footer(page: &CharacterPage, page_number: u32) -> String {
    let mut out = format!("page {page_number} of {} ({} characters)", page.info.pages, page.info.count);
    if page.has_prev() {
        let _ = write!(out, "  prev: --page {}", page_number.saturating_sub(1));
    }
    if page.has_next() {
        let _ = write!(out, "  next: --page {}", page_number.saturating_add(1));
    }
    out
}

/// A page of rows followed by its footer.
pub fn render_page(page: &CharacterPage, page_number: u32, is_favorite: impl Fn(CharacterId) -> bool) -> String {
    let mut out = String::new();
    for character in &page.results {
        out.push_str(&character_line(character, is_favorite(character.id)));
        out.push('\n');
    }
    out.push_str(&page_footer(page, page_number));
    out
}

/// Rows for an unpaged list, such as the favorites view.
pub fn render_list(characters: &[Character], is_favorite: impl Fn(CharacterId) -> bool) -> String {
    characters
        .iter()
        .map(|c| character_line(c, is_favorite(c.id)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[must_use]
pub fn render_detail(character: &Character, favorite: bool) -> String {
    let mut out = String::new();
    let star = if favorite { " [favorite]" } else { "" };
    let _ = writeln!(out, "#{} {}{star}", character.id, character.name);
    let _ = writeln!(out, "  status:   {}", character.status.as_str());
    let _ = writeln!(out, "  species:  {}", character.species);
    if !character.kind.is_empty() {
        let _ = writeln!(out, "  type:     {}", character.kind);
    }
    let _ = writeln!(out, "  gender:   {}", character.gender);
    let _ = writeln!(out, "  origin:   {}", character.origin.name);
    let _ = writeln!(out, "  location: {}", character.location.name);
    let _ = writeln!(out, "  episodes: {}", character.episode.len());
    let _ = write!(out, "  image:    {}", character.image);
    out
}

#[must_use]
pub fn no_match(name: &str) -> String {
    format!("no characters match \"{name}\"")
}
