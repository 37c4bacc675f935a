#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MinMaxOffset {
    pub min_offset: i64,
    pub max_offset: i64,
}

impl MinMaxOffset {
    pub fn messages_count(&self) -> i64 {
        self.max_offset.max(0) - self.min_offset.max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_count_ignores_negative_watermarks() {
        let offsets = MinMaxOffset {
            min_offset: -1,
            max_offset: 42,
        };

        assert_eq!(offsets.messages_count(), 42);
    }

    #[test]
    fn messages_count_is_retained_range() {
        let offsets = MinMaxOffset {
            min_offset: 100,
            max_offset: 250,
        };

        assert_eq!(offsets.messages_count(), 150);
    }
}
