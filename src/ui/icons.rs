pub struct Icons;

impl Icons {
    pub const CART: &str = "🛒";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const STATS: &str = "📊";
    pub const NEW: &str = "✨";
    pub const EDIT: &str = "📝";
    pub const DEL: &str = "🗑️";
    pub const DATABASE: &str = "🗄️";
    pub const BOUGHT: &str = "✔";
    pub const PENDING: &str = "·";
    pub const EMPTY: &str = "∅";
}
