#![allow(clippy::module_name_repetitions)]
#![forbid(non_ascii_idents, unsafe_code)]

mod recording;
mod room_page;
mod utils;
