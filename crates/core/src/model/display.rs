/// Which optional face element a display preference controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayField {
    FrontExample,
    BackExample,
}

/// User preferences for showing the example sentence on each face.
///
/// Both default to shown. Persisted values decode leniently on the storage
/// side: anything but a literal `false` reads as true, so saves written
/// before a preference existed keep the default-on behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySettings {
    show_front_example: bool,
    show_back_example: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_front_example: true,
            show_back_example: true,
        }
    }
}

impl DisplaySettings {
    #[must_use]
    pub fn new(show_front_example: bool, show_back_example: bool) -> Self {
        Self {
            show_front_example,
            show_back_example,
        }
    }

    #[must_use]
    pub fn show_front_example(&self) -> bool {
        self.show_front_example
    }

    #[must_use]
    pub fn show_back_example(&self) -> bool {
        self.show_back_example
    }

    /// Returns the value of one field.
    #[must_use]
    pub fn get(&self, field: DisplayField) -> bool {
        match field {
            DisplayField::FrontExample => self.show_front_example,
            DisplayField::BackExample => self.show_back_example,
        }
    }

    /// Sets one field, returning true when the value actually changed.
    pub fn set(&mut self, field: DisplayField, value: bool) -> bool {
        let slot = match field {
            DisplayField::FrontExample => &mut self.show_front_example,
            DisplayField::BackExample => &mut self.show_back_example,
        };
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }
}
