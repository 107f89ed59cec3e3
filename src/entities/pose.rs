use color_eyre::{Result, eyre::bail};

use crate::assets::SpriteName;

/// Ping-pong animation over poses `1..=total`.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseCycle {
    name: SpriteName,
    total: u32,
    incrementing: bool,
}

impl PoseCycle {
    /// Starts from whatever pose the sprite name carries, which must lie in
    /// `1..=total`. A cycle needs at least two poses.
    pub fn from_image(image: &str, total: u32) -> Result<Self> {
        if total < 2 {
            bail!("sprite {image:?} needs at least two poses to animate, got {total}");
        }
        let name = SpriteName::parse(image)?;
        if !(1..=total).contains(&name.pose) {
            bail!("sprite {image:?} starts at pose {} outside 1..={total}", name.pose);
        }
        Ok(Self {
            name,
            total,
            incrementing: false,
        })
    }

    pub fn current(&self) -> u32 {
        self.name.pose
    }

    pub fn image(&self) -> String {
        self.name.with_pose(self.name.pose)
    }

    /// Steps to the next pose and returns it.
    pub fn advance(&mut self) -> u32 {
        if self.name.pose >= self.total {
            self.incrementing = false;
        }
        if self.name.pose <= 1 {
            self.incrementing = true;
        }
        if self.incrementing {
            self.name.pose += 1;
        } else {
            self.name.pose -= 1;
        }
        self.name.pose
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_pose_cycle_alternates() {
        let mut cycle = PoseCycle::from_image("MetroidLight_1.png", 2).unwrap();
        assert_eq!(cycle.advance(), 2);
        assert_eq!(cycle.advance(), 1);
        assert_eq!(cycle.advance(), 2);
        assert_eq!(cycle.image(), "MetroidLight_2.png");
    }

    #[test]
    fn test_three_pose_cycle_ping_pongs() {
        let mut cycle = PoseCycle::from_image("Ridley_1.png", 3).unwrap();
        let poses: Vec<u32> = (0..6).map(|_| cycle.advance()).collect();
        assert_eq!(poses, vec![2, 3, 2, 1, 2, 3]);
    }

    #[test]
    fn test_cycle_starting_at_top_counts_down() {
        let mut cycle = PoseCycle::from_image("MetroidDark_2.png", 2).unwrap();
        assert_eq!(cycle.advance(), 1);
        assert_eq!(cycle.image(), "MetroidDark_1.png");
    }

    #[test]
    fn test_rejects_single_pose_cycle() {
        assert!(PoseCycle::from_image("Ridley_1.png", 1).is_err());
        assert!(PoseCycle::from_image("Ridley_1.png", 0).is_err());
    }

    #[test]
    fn test_rejects_start_outside_range() {
        assert!(PoseCycle::from_image("Ridley_3.png", 2).is_err());
        assert!(PoseCycle::from_image("Ridley_0.png", 3).is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_pose_stays_in_bounds(
                total in 2u32..8,
                start_offset in 0u32..8,
                steps in 1usize..64,
            ) {
                let start = 1 + start_offset % total;
                let mut cycle = PoseCycle::from_image(&format!("Enemy_{start}.png"), total).unwrap();
                let mut previous = cycle.current();
                for _ in 0..steps {
                    let pose = cycle.advance();
                    prop_assert!((1..=total).contains(&pose));
                    prop_assert_eq!(pose.abs_diff(previous), 1);
                    if previous == total {
                        prop_assert_eq!(pose, total - 1);
                    }
                    if previous == 1 {
                        prop_assert_eq!(pose, 2);
                    }
                    previous = pose;
                }
            }

            #[test]
            fn test_out_of_range_start_is_rejected(
                total in 0u32..8,
                pose in 0u32..16,
            ) {
                let result = PoseCycle::from_image(&format!("Enemy_{pose}.png"), total);
                let valid = total >= 2 && (1..=total).contains(&pose);
                prop_assert_eq!(result.is_ok(), valid);
            }
        }
    }
}
