use bevy::prelude::*;
use constants::record::TOOLTIP_SIGNIFICANT_DIGITS;
use point_cloud_processing::Point3;

use crate::engine::interaction::selection_controller::SelectionController;

#[derive(Component)]
pub struct TooltipText;

/// Format `value` with `digits` significant digits, switching to exponent
/// notation for very small or large magnitudes (`1.23e+3`, `4.56e-7`).
pub fn to_precision(value: f64, digits: usize) -> String {
    let digits = digits.max(1);
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return format!("{:.*}", digits - 1, 0.0);
    }

    let scientific = format!("{:.*e}", digits - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    if exponent < -6 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{}", exponent.abs())
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        format!("{value:.decimals$}")
    }
}

/// Tooltip body for a raw point, one axis per line.
pub fn format_tooltip(point: &Point3) -> String {
    format!(
        "x {}\ny {}\nz {}",
        to_precision(point.x, TOOLTIP_SIGNIFICANT_DIGITS),
        to_precision(point.y, TOOLTIP_SIGNIFICANT_DIGITS),
        to_precision(point.z, TOOLTIP_SIGNIFICANT_DIGITS)
    )
}

pub fn spawn_tooltip(mut commands: Commands) {
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 13.0,
            ..default()
        },
        TextColor(Color::srgb(0.1, 0.1, 0.1)),
        BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.9)),
        Node {
            position_type: PositionType::Absolute,
            padding: UiRect::all(Val::Px(4.0)),
            ..default()
        },
        Visibility::Hidden,
        TooltipText,
    ));
}

/// Mirror the controller's tooltip state onto the UI node.
pub fn sync_tooltip(
    controller: Res<SelectionController>,
    mut tooltips: Query<(&mut Text, &mut Node, &mut Visibility), With<TooltipText>>,
) {
    if !controller.is_changed() {
        return;
    }

    let tooltip = controller.tooltip();
    for (mut text, mut node, mut visibility) in &mut tooltips {
        if text.0 != tooltip.text {
            text.0.clone_from(&tooltip.text);
        }
        node.left = Val::Px(tooltip.left);
        node.top = Val::Px(tooltip.top);
        *visibility = if tooltip.visible {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }
}
