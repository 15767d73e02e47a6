//! Duration picker session state

/// Largest value either picker column presents.
const MAX_COMPONENT: u64 = 59;

/// One open duration-picking session.
///
/// Minutes and seconds are selected independently and composed on commit.
/// Both columns only ever hold values in `0..=59`; setters snap anything
/// larger to 59, so the session has no failure mode of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickerState {
    selected_minutes: u64,
    selected_seconds: u64,
}

impl PickerState {
    /// Open the picker pre-filled from the timer's current time.
    pub fn open(current_duration_seconds: u64) -> Self {
        Self {
            selected_minutes: (current_duration_seconds / 60).min(MAX_COMPONENT),
            selected_seconds: current_duration_seconds % 60,
        }
    }

    pub fn selected_minutes(&self) -> u64 {
        self.selected_minutes
    }

    pub fn selected_seconds(&self) -> u64 {
        self.selected_seconds
    }

    pub fn select_minutes(&mut self, minutes: u64) {
        self.selected_minutes = minutes.min(MAX_COMPONENT);
    }

    pub fn select_seconds(&mut self, seconds: u64) {
        self.selected_seconds = seconds.min(MAX_COMPONENT);
    }

    /// Compose the selection into a total duration in seconds.
    pub fn commit(self) -> u64 {
        self.selected_minutes * 60 + self.selected_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_splits_the_current_duration() {
        let picker = PickerState::open(90);
        assert_eq!(picker.selected_minutes(), 1);
        assert_eq!(picker.selected_seconds(), 30);
    }

    #[test]
    fn open_with_an_over_hour_duration_caps_the_minute_column() {
        let picker = PickerState::open(3700);
        assert_eq!(picker.selected_minutes(), 59);
        assert_eq!(picker.selected_seconds(), 40);
    }

    #[test]
    fn commit_composes_minutes_and_seconds() {
        let mut picker = PickerState::open(0);
        picker.select_minutes(25);
        picker.select_seconds(0);
        assert_eq!(picker.commit(), 1500);

        let mut picker = PickerState::open(1500);
        picker.select_minutes(1);
        picker.select_seconds(15);
        assert_eq!(picker.commit(), 75);
    }

    #[test]
    fn commit_round_trips_edge_selections() {
        for (minutes, seconds) in [(0, 0), (0, 59), (59, 0), (59, 59)] {
            let mut picker = PickerState::open(0);
            picker.select_minutes(minutes);
            picker.select_seconds(seconds);
            assert_eq!(picker.commit(), minutes * 60 + seconds);
        }
    }

    #[test]
    fn setters_snap_out_of_range_values_to_the_last_choice() {
        let mut picker = PickerState::open(0);
        picker.select_minutes(75);
        picker.select_seconds(500);
        assert_eq!(picker.selected_minutes(), 59);
        assert_eq!(picker.selected_seconds(), 59);
    }
}
