/// Knobs of the code generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Bytes of text the runtime can hold between flushes
    pub buffer_cap: usize,
    /// Characters of a link label shown in the menu
    pub menu_label_width: usize,
    /// Number of the first register handed to story variables (`2` is `C`)
    pub first_register: usize,
    /// Hand out the same temp registers again in every passage
    pub reset_temps_per_passage: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            buffer_cap: 511,
            menu_label_width: 28,
            first_register: 2,
            reset_temps_per_passage: true,
        }
    }
}
