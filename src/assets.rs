use color_eyre::{
    Result,
    eyre::{WrapErr, bail, eyre},
};
use std::collections::HashMap;

pub const SHIP: &str = "myShip.png";
pub const MISSILE: &str = "missile.png";
pub const METROID_LIGHT: &str = "MetroidLight_1.png";
pub const METROID_DARK: &str = "MetroidDark_2.png";
pub const BOSS: &str = "Ridley_1.png";
pub const BLASTER: &str = "Blaster_1.png";
pub const GAME_WON: &str = "normal_game_won.jpg";
pub const MENU_BACKGROUND: &str = "Menu_background.jpg";

/// A sprite file name split into `<base>_<pose><extension>`.
///
/// The split happens at the last underscore and the last period, so
/// `Metroid_Light_2.png` has base `Metroid_Light`, pose 2 and extension `.png`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteName {
    pub base: String,
    pub pose: u32,
    pub extension: String,
}

impl SpriteName {
    pub fn parse(filename: &str) -> Result<Self> {
        let underscore = filename
            .rfind('_')
            .ok_or_else(|| eyre!("sprite name {filename:?} has no pose separator"))?;
        let dot = filename
            .rfind('.')
            .ok_or_else(|| eyre!("sprite name {filename:?} has no extension"))?;
        if dot <= underscore {
            bail!("sprite name {filename:?} has its extension before the pose index");
        }

        let pose = filename[underscore + 1..dot]
            .parse::<u32>()
            .wrap_err_with(|| format!("sprite name {filename:?} has a non-numeric pose"))?;

        Ok(Self {
            base: filename[..underscore].to_string(),
            pose,
            extension: filename[dot..].to_string(),
        })
    }

    /// File name of the same sprite in another pose.
    pub fn with_pose(&self, pose: u32) -> String {
        format!("{}_{}{}", self.base, pose, self.extension)
    }
}

/// World size and terminal glyph art for one image.
#[derive(Debug, Clone, Copy)]
pub struct Asset {
    pub width: f64,
    pub height: f64,
    pub art: &'static [&'static str],
}

/// Every image the game can put on screen, looked up by file name.
#[derive(Debug, Clone)]
pub struct AssetCatalog {
    assets: HashMap<&'static str, Asset>,
}

impl Default for AssetCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AssetCatalog {
    pub fn builtin() -> Self {
        let entries: [(&'static str, Asset); 13] = [
            (
                SHIP,
                Asset {
                    width: 40.0,
                    height: 40.0,
                    art: &[" /^\\ ", "<|||>", " ||| "],
                },
            ),
            (
                MISSILE,
                Asset {
                    width: 6.0,
                    height: 15.0,
                    art: &["|"],
                },
            ),
            (
                "MetroidLight_1.png",
                Asset {
                    width: 48.0,
                    height: 35.0,
                    art: &["(ooooo)", " /| |\\ "],
                },
            ),
            (
                "MetroidLight_2.png",
                Asset {
                    width: 48.0,
                    height: 35.0,
                    art: &["(ooooo)", " \\| |/ "],
                },
            ),
            (
                "MetroidDark_1.png",
                Asset {
                    width: 48.0,
                    height: 35.0,
                    art: &["(#####)", " /| |\\ "],
                },
            ),
            (
                "MetroidDark_2.png",
                Asset {
                    width: 48.0,
                    height: 35.0,
                    art: &["(#####)", " \\| |/ "],
                },
            ),
            (
                "Ridley_1.png",
                Asset {
                    width: 150.0,
                    height: 100.0,
                    art: &[
                        "\\\\                  //",
                        " \\\\\\    /^^^\\    /// ",
                        "  \\\\\\\\==|O O|==//// ",
                        "        \\_v_/        ",
                        "        /| |\\        ",
                    ],
                },
            ),
            (
                "Ridley_2.png",
                Asset {
                    width: 150.0,
                    height: 100.0,
                    art: &[
                        "                     ",
                        "  ___    /^^^\\    ___ ",
                        " ////===|O O|===\\\\\\\\ ",
                        "        \\_v_/        ",
                        "        /| |\\        ",
                    ],
                },
            ),
            (
                "Ridley_3.png",
                Asset {
                    width: 150.0,
                    height: 100.0,
                    art: &[
                        "                     ",
                        "         /^^^\\       ",
                        "  ////==|O O|==\\\\\\\\  ",
                        " ///     \\_v_/   \\\\\\ ",
                        "//       /| |\\     \\\\",
                    ],
                },
            ),
            (
                "Blaster_1.png",
                Asset {
                    width: 40.0,
                    height: 30.0,
                    art: &["[==>", "[==>"],
                },
            ),
            (
                "Blaster_2.png",
                Asset {
                    width: 40.0,
                    height: 30.0,
                    art: &["[##}", "[##}"],
                },
            ),
            (
                GAME_WON,
                Asset {
                    width: 700.0,
                    height: 560.0,
                    art: &[
                        "",
                        "          .     *        .        *       .",
                        "     *        ___________        .",
                        "          .  '._==_==_=_.'   *        .",
                        "    .        .-\\:      /-.         *",
                        "       *    | (|:.     |) |    .",
                        "             '-|:.     |-'       .",
                        "     .         \\::.    /     *",
                        "         *      '::. .'          .",
                        "                  ) (     .",
                        "      .         _.' '._        *",
                        "               '-------'",
                    ],
                },
            ),
            (
                MENU_BACKGROUND,
                Asset {
                    width: 700.0,
                    height: 700.0,
                    art: &[
                        "   *        .         (ooooo)        .       *",
                        "        .        *     /| |\\    *        .",
                        "  .   (#####)                     (#####)     .",
                        "       /| |\\      //  /^^^\\  \\\\    /| |\\",
                        "   *          ====|  |O O|  |====       *",
                        "        .          \\\\ \\_v_/ //     .",
                        "  .        *          /| |\\           *     .",
                        "                        /^\\",
                        "      .        *       <|||>     .        *",
                    ],
                },
            ),
        ];

        Self {
            assets: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, name: &str) -> Result<&Asset> {
        self.assets
            .get(name)
            .ok_or_else(|| eyre!("missing sprite resource {name:?}"))
    }
}
