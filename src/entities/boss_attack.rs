use color_eyre::Result;
use tracing::debug;

use crate::assets::SpriteName;
use crate::geometry::Rect;
use crate::scene::{Fill, NodeId, Scene};

/// Blasters: warning sprites at both screen edges marking where the beam
/// will cross. Beam: the rectangle between them that ends the game on touch.
#[derive(Debug, Clone)]
pub struct BlasterRig {
    image: String,
    y: f64,
    screen_width: f64,
    blaster_width: f64,
    blaster_height: f64,
    beam: Rect,
    beam_fill: Fill,
    thickness: f64,
    left: Option<NodeId>,
    right: Option<NodeId>,
    beam_node: Option<NodeId>,
}

impl BlasterRig {
    /// Lays out the rig without showing anything.
    pub fn new(scene: &Scene, image: &str, screen_width: f64, y: f64, thickness: f64) -> Result<Self> {
        let asset = scene.asset(image)?;
        let blaster_width = asset.width;
        let blaster_height = asset.height;

        Ok(Self {
            image: image.to_string(),
            y,
            screen_width,
            blaster_width,
            blaster_height,
            beam: Rect::new(blaster_width, y + blaster_height / 2.0, 0.0, 0.0),
            beam_fill: Fill::Beam,
            thickness,
            left: None,
            right: None,
            beam_node: None,
        })
    }

    pub fn display_all(&mut self, scene: &mut Scene) -> Result<()> {
        self.beam_node = Some(scene.add_shape(self.beam, self.beam_fill));
        self.display_blasters(scene)
    }

    /// Left blaster hugs x = 0, the right one is its mirror image at the far edge.
    pub fn display_blasters(&mut self, scene: &mut Scene) -> Result<()> {
        self.left = Some(scene.add_sprite(&self.image, 0.0, self.y)?);
        self.right = Some(scene.add_mirrored_sprite(
            &self.image,
            self.screen_width - self.blaster_width,
            self.y,
        )?);
        Ok(())
    }

    /// Changes the blaster look; takes effect on the next display.
    pub fn set_blaster_image(&mut self, image: &str) {
        self.image = image.to_string();
    }

    pub fn blaster_image(&self) -> &str {
        &self.image
    }

    pub fn clean_up_blasters(&mut self, scene: &mut Scene) {
        for node in [self.left.take(), self.right.take()].into_iter().flatten() {
            scene.remove(node);
        }
    }

    pub fn clean_up_all(&mut self, scene: &mut Scene) {
        if let Some(node) = self.beam_node.take() {
            scene.remove(node);
        }
        self.clean_up_blasters(scene);
    }

    pub fn start_beam(&mut self, scene: &mut Scene) {
        self.beam.width = self.screen_width - self.blaster_width * 2.0;
        self.beam.height = 0.0;
        self.sync_beam(scene);
    }

    /// Grows the beam over the first half of its lifetime, then holds it at
    /// full thickness centred on the blasters.
    pub fn set_beam_progress(&mut self, scene: &mut Scene, fraction_done: f64) {
        let fraction = fraction_done.clamp(0.0, 0.5);
        self.beam.height = self.thickness * fraction * 2.0;
        self.beam.y = self.y + self.blaster_height / 2.0 - self.beam.height / 2.0;
        self.sync_beam(scene);
    }

    pub fn set_beam_red(&mut self, scene: &mut Scene) {
        self.beam_fill = Fill::BeamHit;
        if let Some(node) = self.beam_node {
            scene.set_fill(node, self.beam_fill);
        }
    }

    pub fn beam(&self) -> Rect {
        self.beam
    }

    pub fn beam_fill(&self) -> Fill {
        self.beam_fill
    }

    fn sync_beam(&self, scene: &mut Scene) {
        if let Some(node) = self.beam_node {
            scene.set_shape(node, self.beam);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackPhase {
    NotStarted,
    /// Blasters on screen, beam not yet fired
    Armed,
    Firing,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackStatus {
    Running,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackTiming {
    pub delay_ms: u64,
    pub duration_ms: u64,
    pub thickness: f64,
}

/// One telegraphed beam sweep: blasters appear, after `delay_ms` the beam
/// fires and widens, after a further `duration_ms` everything is removed.
#[derive(Debug, Clone)]
pub struct BossAttack {
    rig: BlasterRig,
    charged_image: String,
    timing: AttackTiming,
    phase: AttackPhase,
    started_ms: Option<u64>,
}

impl BossAttack {
    /// `image` is the idle blaster look `<base>_1<ext>`; the charged look is
    /// `<base>_2<ext>`.
    pub fn new(scene: &Scene, y: f64, screen_width: f64, image: &str, timing: AttackTiming) -> Result<Self> {
        let charged_image = SpriteName::parse(image)?.with_pose(2);
        scene.asset(&charged_image)?;
        let rig = BlasterRig::new(scene, image, screen_width, y, timing.thickness)?;

        Ok(Self {
            rig,
            charged_image,
            timing,
            phase: AttackPhase::NotStarted,
            started_ms: None,
        })
    }

    pub fn begin(&mut self, scene: &mut Scene, now_ms: u64) -> Result<()> {
        self.rig.display_all(scene)?;
        self.started_ms = Some(now_ms);
        self.phase = AttackPhase::Armed;
        Ok(())
    }

    /// Call once per frame. An attack that was never begun stays inert.
    pub fn progress(&mut self, scene: &mut Scene, now_ms: u64) -> Result<AttackStatus> {
        let Some(started_ms) = self.started_ms else {
            return Ok(AttackStatus::Running);
        };
        if self.phase == AttackPhase::Expired {
            return Ok(AttackStatus::Finished);
        }

        let elapsed = now_ms.saturating_sub(started_ms) as f64;
        let delay = self.timing.delay_ms as f64;
        let fraction_done = (elapsed - delay) / self.timing.duration_ms as f64;

        if self.phase == AttackPhase::Armed && elapsed >= delay {
            self.rig.clean_up_blasters(scene);
            self.rig.set_blaster_image(&self.charged_image);
            self.rig.display_blasters(scene)?;
            self.rig.start_beam(scene);
            self.phase = AttackPhase::Firing;
            debug!(y = self.rig.beam().y, "boss beam fired");
        }

        if self.phase == AttackPhase::Firing {
            self.rig.set_beam_progress(scene, fraction_done);
        }

        if fraction_done >= 1.0 {
            self.clean_up(scene);
            self.phase = AttackPhase::Expired;
            return Ok(AttackStatus::Finished);
        }
        Ok(AttackStatus::Running)
    }

    pub fn set_beam_red(&mut self, scene: &mut Scene) {
        self.rig.set_beam_red(scene);
    }

    pub fn clean_up(&mut self, scene: &mut Scene) {
        self.rig.clean_up_all(scene);
    }

    /// The beam only exists for collisions while it is firing.
    pub fn beam_bounds(&self) -> Option<Rect> {
        (self.phase == AttackPhase::Firing).then(|| self.rig.beam())
    }

    pub fn beam_height(&self) -> f64 {
        self.rig.beam().height
    }

    pub fn phase(&self) -> AttackPhase {
        self.phase
    }

    pub fn rig(&self) -> &BlasterRig {
        &self.rig
    }
}
