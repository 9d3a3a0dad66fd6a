use crate::core::film_card::FilmCard;
use crate::core::related::RelatedLoader;
use crate::domain::model::{EntityKind, Film, LoadingState, RelatedEntity};
use crate::domain::ports::FilmApi;
use std::io::{self, Write};

pub fn render_loading<W: Write>(out: &mut W, what: &str) -> io::Result<()> {
    writeln!(out, "  ... loading {}", what)
}

pub fn render_error<W: Write>(out: &mut W, message: &str) -> io::Result<()> {
    writeln!(out, "  ! {}", message)
}

pub fn release_line(film: &Film) -> String {
    match film.release_date() {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => film.release_date.clone(),
    }
}

pub fn render_film_header<W: Write>(out: &mut W, film: &Film) -> io::Result<()> {
    writeln!(out, "Episode {}: {}", film.episode_id, film.title)?;
    writeln!(out, "  Directed by {}", film.director)?;
    writeln!(out, "  Produced by {}", film.producer)?;
    writeln!(out, "  Released {}", release_line(film))
}

fn render_section<E, A, W>(out: &mut W, loader: &RelatedLoader<E, A>) -> io::Result<()>
where
    E: RelatedEntity,
    A: FilmApi + 'static,
    W: Write,
{
    writeln!(out, "  {} ({})", E::KIND, loader.urls().len())?;
    let state = loader.loading_state();
    if state.is_loading {
        return render_loading(out, &E::KIND.label().to_lowercase());
    }
    if let Some(message) = &state.error {
        return render_error(out, message);
    }
    let entities = loader.entities();
    if entities.is_empty() {
        return writeln!(out, "    (none)");
    }
    for entity in &entities {
        writeln!(out, "    - {}: {}", entity.name(), entity.summary())?;
    }
    Ok(())
}

pub fn render_film_card<W, A>(
    out: &mut W,
    card: &FilmCard<A>,
    expanded: &[EntityKind],
    crawl_length: usize,
) -> io::Result<()>
where
    W: Write,
    A: FilmApi + 'static,
{
    render_film_header(out, card.film())?;
    writeln!(out)?;
    for line in card.crawl_preview(crawl_length).lines() {
        writeln!(out, "  {}", line.trim_end())?;
    }

    for kind in EntityKind::ALL {
        if !expanded.contains(&kind) {
            continue;
        }
        writeln!(out)?;
        match kind {
            EntityKind::Characters => render_section(out, &card.characters)?,
            EntityKind::Starships => render_section(out, &card.starships)?,
            EntityKind::Vehicles => render_section(out, &card.vehicles)?,
            EntityKind::Species => render_section(out, &card.species)?,
        }
    }
    writeln!(out)
}

/// 電影清單區塊的狀態：載入中、錯誤或空結果
pub fn render_list_status<W: Write>(
    out: &mut W,
    state: &LoadingState,
    shown: usize,
    search: &str,
) -> io::Result<()> {
    if state.is_loading {
        return render_loading(out, "films");
    }
    if let Some(message) = &state.error {
        return render_error(out, message);
    }
    if shown == 0 && !search.is_empty() {
        return writeln!(out, "No films found matching your search criteria.");
    }
    Ok(())
}
