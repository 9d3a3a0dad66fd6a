pub mod film_card;
pub mod film_list;
pub mod related;
pub mod search;

#[cfg(test)]
pub(crate) mod testing;
