//! Tray icon rendering
//!
//! Draws a small coin-style icon whose colour reflects the balance status

use crate::core::DisplayState;

/// Icon edge length in pixels
pub const ICON_SIZE: u32 = 32;

/// Balance status level for icon color
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BalanceLevel {
    /// Money left - green
    Funded,
    /// Zero or overdrawn - red
    Depleted,
    /// Loading, error or no key - gray
    Unknown,
}

impl BalanceLevel {
    pub fn from_state(state: &DisplayState) -> Self {
        match state {
            DisplayState::Ok { snapshot, .. } if snapshot.remaining() > 0.0 => BalanceLevel::Funded,
            DisplayState::Ok { .. } => BalanceLevel::Depleted,
            _ => BalanceLevel::Unknown,
        }
    }

    /// Get RGB color for this level
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            BalanceLevel::Funded => (76, 175, 80),    // Green
            BalanceLevel::Depleted => (244, 67, 54),  // Red
            BalanceLevel::Unknown => (158, 158, 158), // Gray
        }
    }
}

/// RGBA pixels for a filled circle with a darker rim and a "$"-ish bar in the middle
pub fn render_rgba(level: BalanceLevel) -> Vec<u8> {
    let (r, g, b) = level.color();
    let size = ICON_SIZE;
    let mut rgba = Vec::with_capacity((size * size * 4) as usize);

    let fill = (r, g, b, 255u8);
    let rim = (r / 2, g / 2, b / 2, 255u8);
    let mark = (255u8, 255u8, 255u8, 255u8);
    let clear = (0u8, 0u8, 0u8, 0u8);

    let c = size as i32 / 2;
    let outer = 14i32;
    let inner = 12i32;

    for y in 0..size as i32 {
        for x in 0..size as i32 {
            let dx = x - c;
            let dy = y - c;
            let dist_sq = dx * dx + dy * dy;

            let in_bar = dx.abs() <= 1 && dy.abs() <= 8;
            let in_stroke = dx.abs() <= 5 && [-6, 0, 6].iter().any(|row| (dy - row).abs() <= 1);
            let in_mark = in_bar || in_stroke;

            let pixel = if dist_sq > outer * outer {
                clear
            } else if dist_sq > inner * inner {
                rim
            } else if in_mark {
                mark
            } else {
                fill
            };

            rgba.extend_from_slice(&[pixel.0, pixel.1, pixel.2, pixel.3]);
        }
    }

    rgba
}

/// Build a tray icon for a status level
pub fn tray_icon_for(level: BalanceLevel) -> anyhow::Result<tray_icon::Icon> {
    let icon = tray_icon::Icon::from_rgba(render_rgba(level), ICON_SIZE, ICON_SIZE)?;
    Ok(icon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BalanceSnapshot;
    use chrono::Local;

    fn ok_state(credits: f64, usage: f64) -> DisplayState {
        DisplayState::Ok {
            snapshot: BalanceSnapshot::new(credits, usage),
            at: Local::now(),
        }
    }

    #[test]
    fn test_level_from_state() {
        assert_eq!(BalanceLevel::from_state(&ok_state(10.0, 2.0)), BalanceLevel::Funded);
        assert_eq!(BalanceLevel::from_state(&ok_state(10.0, 10.0)), BalanceLevel::Depleted);
        assert_eq!(BalanceLevel::from_state(&ok_state(10.0, 12.0)), BalanceLevel::Depleted);
        assert_eq!(BalanceLevel::from_state(&DisplayState::Loading), BalanceLevel::Unknown);
        assert_eq!(BalanceLevel::from_state(&DisplayState::NoCredential), BalanceLevel::Unknown);
        assert_eq!(
            BalanceLevel::from_state(&DisplayState::Error { at: Local::now() }),
            BalanceLevel::Unknown
        );
    }

    #[test]
    fn test_level_color() {
        let (r, g, _b) = BalanceLevel::Funded.color();
        assert!(r < g); // Green should be dominant

        let (r, g, b) = BalanceLevel::Depleted.color();
        assert!(r > g && r > b); // Red should be dominant
    }

    #[test]
    fn test_render_rgba_dimensions() {
        let rgba = render_rgba(BalanceLevel::Unknown);
        assert_eq!(rgba.len(), (ICON_SIZE * ICON_SIZE * 4) as usize);

        // Corners are transparent, center is the white mark
        assert_eq!(rgba[3], 0);
        let center = ((ICON_SIZE / 2 * ICON_SIZE + ICON_SIZE / 2) * 4) as usize;
        assert_eq!(&rgba[center..center + 4], &[255, 255, 255, 255]);
    }
}
