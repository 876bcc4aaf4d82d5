#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Refresh,
    ToggleCores,
    ToggleHelp,
    None,
}
