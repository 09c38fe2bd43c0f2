pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{alert, dim, error, header, info, section, success, warn};
pub use table::{items_table, stats_table, TableBuilder};
pub use theme::{theme, Theme};
