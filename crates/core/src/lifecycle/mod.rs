//! Lifecycle of a photo: pending upload, queued print, placed print.
//!
//! [`PhotoBooth`] owns all three collections behind one lock and is cheap to
//! clone; clones share state. `develop` is the only operation that awaits, and
//! it never holds the lock across an await point, so uploads, caption edits,
//! releases and surface edits can interleave with a running batch.

use std::{
    collections::{BTreeSet, VecDeque},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use serde::Serialize;

use crate::{
    config::BoothConfig,
    framing::{FramedArtifact, FramedBitmap, Framer, PolaroidFramer},
    surface::{PlacedItem, RandomSource, SeededRandom, SpatialModel},
    BoothError, PhotoId, Result, SourceImage,
};

/// Where a photo currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PhotoState {
    Pending,
    Queued,
    Placed,
    /// Deleted by the user, or dropped because it could not be framed.
    Removed,
}

/// Outcome of one develop run, in processing order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DevelopReport {
    pub framed: Vec<PhotoId>,
    pub failed: Vec<PhotoId>,
    /// Removed from the pending list before their turn came.
    pub withdrawn: Vec<PhotoId>,
}

/// Pending upload as shown to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct PendingView {
    pub id: PhotoId,
    pub caption: String,
    pub dimensions: Option<(u32, u32)>,
}

/// Read-only view of the whole booth.
#[derive(Debug, Clone, Serialize)]
pub struct BoothSnapshot {
    pub pending: Vec<PendingView>,
    pub queue_depth: usize,
    pub placed: Vec<PlacedItem>,
    pub progress_percent: f32,
    pub developing: bool,
}

#[derive(Debug)]
struct PendingPhoto {
    id: PhotoId,
    source: SourceImage,
}

#[derive(Debug)]
struct BoothState {
    next_id: u64,
    pending: Vec<PendingPhoto>,
    queued: VecDeque<FramedArtifact>,
    placed: Vec<PlacedItem>,
    removed: BTreeSet<PhotoId>,
    developing: bool,
    progress: f32,
    spatial: SpatialModel,
}

/// The photo booth: pending uploads, the release queue and the surface.
#[derive(Clone)]
pub struct PhotoBooth {
    shared: Arc<Mutex<BoothState>>,
    framer: Arc<dyn Framer>,
    target_width: u32,
    pacing: Duration,
}

impl PhotoBooth {
    /// Creates a booth with the stock framer and an entropy-seeded layout.
    pub fn new(config: BoothConfig) -> Result<Self> {
        let framer = Arc::new(PolaroidFramer::new(&config.framing));
        Self::with_parts(config, framer, Box::new(SeededRandom::from_entropy()))
    }

    /// Creates a booth from explicit collaborators.
    pub fn with_parts(
        config: BoothConfig,
        framer: Arc<dyn Framer>,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self> {
        config.validate()?;
        let state = BoothState {
            next_id: 1,
            pending: Vec::new(),
            queued: VecDeque::new(),
            placed: Vec::new(),
            removed: BTreeSet::new(),
            developing: false,
            progress: 0.0,
            spatial: SpatialModel::new(config.surface.clone(), rng),
        };
        Ok(Self {
            shared: Arc::new(Mutex::new(state)),
            framer,
            target_width: config.framing.target_width,
            pacing: Duration::from_millis(config.develop.pacing_ms),
        })
    }

    /// Appends an upload to the pending list. Duplicates are welcome.
    pub fn add_pending(&self, source: SourceImage) -> Result<PhotoId> {
        let mut state = self.lock()?;
        let id = PhotoId(state.next_id);
        state.next_id += 1;
        state.pending.push(PendingPhoto { id, source });
        Ok(id)
    }

    /// Changes the caption of a pending photo. Ignored for any other id.
    pub fn update_caption(&self, id: PhotoId, caption: impl Into<String>) -> Result<()> {
        let mut state = self.lock()?;
        if let Some(photo) = state.pending.iter_mut().find(|p| p.id == id) {
            photo.source.caption = caption.into();
        }
        Ok(())
    }

    /// Deletes a pending photo. Returns whether anything was removed.
    pub fn remove_pending(&self, id: PhotoId) -> Result<bool> {
        let mut state = self.lock()?;
        let Some(index) = state.pending.iter().position(|p| p.id == id) else {
            return Ok(false);
        };
        state.pending.remove(index);
        state.removed.insert(id);
        Ok(true)
    }

    /// Deletes a print from the surface. Returns whether anything was removed.
    pub fn remove_placed(&self, id: PhotoId) -> Result<bool> {
        let mut state = self.lock()?;
        let Some(index) = state.placed.iter().position(|p| p.id() == id) else {
            return Ok(false);
        };
        state.placed.remove(index);
        state.removed.insert(id);
        Ok(true)
    }

    /// Frames every photo that is pending when the call starts, oldest first,
    /// and appends the prints to the release queue.
    ///
    /// Photos that fail to frame are logged and dropped; the rest of the batch
    /// carries on. Photos uploaded while the batch runs stay pending for the
    /// next run. A call made while another run is in flight is rejected with
    /// [`BoothError::DevelopInProgress`].
    pub async fn develop(&self) -> Result<DevelopReport> {
        let batch: Vec<PhotoId> = {
            let mut state = self.lock()?;
            if state.developing {
                return Err(BoothError::DevelopInProgress);
            }
            if state.pending.is_empty() {
                return Ok(DevelopReport::default());
            }
            state.developing = true;
            state.progress = 0.0;
            state.pending.iter().map(|p| p.id).collect()
        };
        let _guard = DevelopGuard {
            shared: &self.shared,
        };

        tracing::info!(total = batch.len(), "developing pending photos");
        let report = self.develop_batch(&batch).await?;
        tracing::info!(
            framed = report.framed.len(),
            failed = report.failed.len(),
            withdrawn = report.withdrawn.len(),
            "develop finished"
        );
        Ok(report)
    }

    async fn develop_batch(&self, batch: &[PhotoId]) -> Result<DevelopReport> {
        let total = batch.len();
        let mut report = DevelopReport::default();

        for (done, &id) in batch.iter().enumerate() {
            let source = {
                let state = self.lock()?;
                state
                    .pending
                    .iter()
                    .find(|p| p.id == id)
                    .map(|p| p.source.clone())
            };

            match source {
                None => report.withdrawn.push(id),
                Some(source) => {
                    let outcome = self.frame_off_thread(source).await;
                    let mut state = self.lock()?;
                    state.pending.retain(|p| p.id != id);
                    match outcome {
                        Ok(bitmap) => {
                            state.queued.push_back(FramedArtifact::new(id, bitmap));
                            report.framed.push(id);
                        }
                        Err(err) => {
                            tracing::warn!(%id, %err, "dropping photo that could not be framed");
                            state.removed.insert(id);
                            report.failed.push(id);
                        }
                    }
                }
            }

            self.lock()?.progress = (done + 1) as f32 / total as f32;

            if !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }
        }

        Ok(report)
    }

    async fn frame_off_thread(&self, source: SourceImage) -> Result<FramedBitmap> {
        let framer = Arc::clone(&self.framer);
        let width = self.target_width;
        tokio::task::spawn_blocking(move || framer.frame(&source, &source.caption, width))
            .await
            .map_err(|err| BoothError::msg(format!("framing task failed: {err}")))?
    }

    /// Moves the oldest queued print onto the surface. Returns `None` when the
    /// queue is empty.
    pub fn release(&self, surface_width: f32, surface_height: f32) -> Result<Option<PlacedItem>> {
        let mut state = self.lock()?;
        let Some(artifact) = state.queued.pop_front() else {
            return Ok(None);
        };
        let item = state.spatial.place(artifact, surface_width, surface_height);
        tracing::info!(id = %item.id(), z_index = item.z_index, "released print");
        state.placed.push(item.clone());
        Ok(Some(item))
    }

    /// Raises a placed print above all others. Returns its new stacking index.
    pub fn bring_to_front(&self, id: PhotoId) -> Result<Option<u64>> {
        let mut guard = self.lock()?;
        let BoothState {
            placed, spatial, ..
        } = &mut *guard;
        Ok(placed
            .iter_mut()
            .find(|p| p.id() == id)
            .map(|item| spatial.bring_to_front(item)))
    }

    /// Nudges the scale of a placed print. Returns the clamped scale.
    pub fn rescale(&self, id: PhotoId, delta: f32) -> Result<Option<f32>> {
        let mut guard = self.lock()?;
        let BoothState {
            placed, spatial, ..
        } = &mut *guard;
        Ok(placed
            .iter_mut()
            .find(|p| p.id() == id)
            .map(|item| spatial.rescale(item, delta)))
    }

    /// Drags a placed print. User moves are not bounded by the surface.
    pub fn move_item(&self, id: PhotoId, x: f32, y: f32) -> Result<bool> {
        let mut state = self.lock()?;
        let Some(item) = state.placed.iter_mut().find(|p| p.id() == id) else {
            return Ok(false);
        };
        item.x = x;
        item.y = y;
        Ok(true)
    }

    pub fn state_of(&self, id: PhotoId) -> Result<Option<PhotoState>> {
        let state = self.lock()?;
        let found = if state.pending.iter().any(|p| p.id == id) {
            Some(PhotoState::Pending)
        } else if state.queued.iter().any(|a| a.id == id) {
            Some(PhotoState::Queued)
        } else if state.placed.iter().any(|p| p.id() == id) {
            Some(PhotoState::Placed)
        } else if state.removed.contains(&id) {
            Some(PhotoState::Removed)
        } else {
            None
        };
        Ok(found)
    }

    /// Print of a queued or placed photo.
    pub fn artifact(&self, id: PhotoId) -> Result<Option<FramedArtifact>> {
        let state = self.lock()?;
        let queued = state.queued.iter().find(|a| a.id == id);
        let placed = state.placed.iter().map(|p| &p.artifact).find(|a| a.id == id);
        Ok(queued.or(placed).cloned())
    }

    /// Fraction of the running develop batch that has been processed.
    pub fn progress(&self) -> Result<f32> {
        Ok(self.lock()?.progress)
    }

    pub fn is_developing(&self) -> Result<bool> {
        Ok(self.lock()?.developing)
    }

    pub fn queue_depth(&self) -> Result<usize> {
        Ok(self.lock()?.queued.len())
    }

    /// Placed prints bottom to top, the order an export should paint them in.
    pub fn export_order(&self) -> Result<Vec<PlacedItem>> {
        let mut items = self.lock()?.placed.clone();
        items.sort_by_key(|item| item.z_index);
        Ok(items)
    }

    pub fn snapshot(&self) -> Result<BoothSnapshot> {
        let state = self.lock()?;
        Ok(BoothSnapshot {
            pending: state
                .pending
                .iter()
                .map(|p| PendingView {
                    id: p.id,
                    caption: p.source.caption.clone(),
                    dimensions: p.source.dimensions(),
                })
                .collect(),
            queue_depth: state.queued.len(),
            placed: state.placed.clone(),
            progress_percent: state.progress * 100.0,
            developing: state.developing,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, BoothState>> {
        self.shared
            .lock()
            .map_err(|_| BoothError::msg("photo booth state has been poisoned"))
    }
}

impl std::fmt::Debug for PhotoBooth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoBooth")
            .field("target_width", &self.target_width)
            .field("pacing", &self.pacing)
            .finish()
    }
}

/// Clears the in-flight flag and progress however a develop run ends.
struct DevelopGuard<'a> {
    shared: &'a Mutex<BoothState>,
}

impl Drop for DevelopGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
        state.developing = false;
        state.progress = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use image::{DynamicImage, RgbaImage};

    use super::*;
    use crate::framing::{CaptionRenderer, FrameLayout};

    const WIDTH: u32 = 100;

    fn config() -> BoothConfig {
        let mut config = BoothConfig::default();
        config.framing.target_width = WIDTH;
        config
    }

    fn plain_framer() -> PolaroidFramer {
        PolaroidFramer::with_captions(CaptionRenderer::without_fonts())
    }

    fn booth_with(framer: Arc<dyn Framer>) -> PhotoBooth {
        PhotoBooth::with_parts(config(), framer, Box::new(SeededRandom::new(11))).unwrap()
    }

    fn booth() -> PhotoBooth {
        booth_with(Arc::new(plain_framer()))
    }

    fn source(width: u32, height: u32, caption: &str) -> SourceImage {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            image::Rgba([90, 140, 200, 255]),
        ));
        SourceImage::from_image(&img).unwrap().with_caption(caption)
    }

    /// Remembers the captions it was asked to draw.
    struct RecordingFramer {
        inner: PolaroidFramer,
        captions: Mutex<Vec<String>>,
    }

    impl Framer for RecordingFramer {
        fn frame(&self, source: &SourceImage, caption: &str, width: u32) -> Result<FramedBitmap> {
            self.captions.lock().unwrap().push(caption.to_string());
            self.inner.frame(source, caption, width)
        }
    }

    /// Takes its time, standing in for a slow decode.
    struct SlowFramer {
        inner: PolaroidFramer,
        delay: Duration,
    }

    impl Framer for SlowFramer {
        fn frame(&self, source: &SourceImage, caption: &str, width: u32) -> Result<FramedBitmap> {
            std::thread::sleep(self.delay);
            self.inner.frame(source, caption, width)
        }
    }

    fn slow_booth() -> PhotoBooth {
        booth_with(Arc::new(SlowFramer {
            inner: plain_framer(),
            delay: Duration::from_millis(50),
        }))
    }

    fn band_has_ink(booth: &PhotoBooth, id: PhotoId) -> bool {
        let artifact = booth.artifact(id).unwrap().unwrap();
        let canvas = image::load_from_memory(artifact.png()).unwrap().to_rgba8();
        let layout = FrameLayout::for_width(artifact.width).unwrap();
        ((layout.band_top() + 1)..layout.height)
            .any(|y| (0..layout.width).any(|x| canvas.get_pixel(x, y).0 != [255, 255, 255, 255]))
    }

    async fn wait_until_developing(booth: &PhotoBooth) {
        while !booth.is_developing().unwrap() {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn develops_uploads_in_arrival_order() {
        let captions = CaptionRenderer::with_system_fonts(config().framing.caption_fonts);
        let has_fonts = captions.has_fonts();
        let framer = Arc::new(RecordingFramer {
            inner: PolaroidFramer::with_captions(captions),
            captions: Mutex::new(Vec::new()),
        });
        let booth = booth_with(framer.clone());

        let a = booth.add_pending(source(800, 400, "A")).unwrap();
        let b = booth.add_pending(source(800, 400, "")).unwrap();
        let c = booth.add_pending(source(400, 800, "C")).unwrap();

        let report = booth.develop().await.unwrap();
        assert_eq!(report.framed, vec![a, b, c]);
        assert!(report.failed.is_empty());
        assert_eq!(*framer.captions.lock().unwrap(), vec!["A", "", "C"]);

        let snapshot = booth.snapshot().unwrap();
        assert!(snapshot.pending.is_empty());
        assert_eq!(snapshot.queue_depth, 3);
        assert_eq!(snapshot.progress_percent, 0.0);
        assert!(!snapshot.developing);

        for id in [a, b, c] {
            let artifact = booth.artifact(id).unwrap().unwrap();
            assert_eq!((artifact.width, artifact.height), (100, 125));
            let decoded = image::load_from_memory(artifact.png()).unwrap();
            assert_eq!(decoded.height() * 4, decoded.width() * 5);
            assert_eq!(booth.state_of(id).unwrap(), Some(PhotoState::Queued));
        }

        assert!(!band_has_ink(&booth, b));
        if has_fonts {
            assert!(band_has_ink(&booth, a));
            assert!(band_has_ink(&booth, c));
        }
    }

    #[tokio::test]
    async fn failed_items_are_dropped_and_survivors_keep_order() {
        let booth = booth();
        let a = booth.add_pending(source(30, 20, "ok")).unwrap();
        let broken = booth
            .add_pending(SourceImage::deferred(b"corrupt".to_vec()))
            .unwrap();
        let c = booth.add_pending(source(20, 30, "ok too")).unwrap();

        let report = booth.develop().await.unwrap();
        assert_eq!(report.framed, vec![a, c]);
        assert_eq!(report.failed, vec![broken]);
        assert_eq!(booth.queue_depth().unwrap(), 2);
        assert_eq!(booth.state_of(broken).unwrap(), Some(PhotoState::Removed));

        let first = booth.release(1000.0, 800.0).unwrap().unwrap();
        assert_eq!(first.id(), a);
    }

    #[tokio::test]
    async fn releases_in_fifo_order_with_increasing_stacking() {
        let booth = booth();
        let ids: Vec<_> = (0..3)
            .map(|i| booth.add_pending(source(40 + i, 30, "")).unwrap())
            .collect();
        booth.develop().await.unwrap();

        let (surface_w, surface_h) = (1024.0, 768.0);
        let placed: Vec<_> = (0..3)
            .map(|_| booth.release(surface_w, surface_h).unwrap().unwrap())
            .collect();

        assert_eq!(placed.iter().map(PlacedItem::id).collect::<Vec<_>>(), ids);
        assert_eq!(
            placed.iter().map(|p| p.z_index).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        for item in &placed {
            assert!(item.x >= 50.0 && item.x <= surface_w - 50.0 - 150.0);
            assert!(item.y >= 50.0 && item.y <= surface_h - 50.0 - 200.0);
            assert_eq!(booth.state_of(item.id()).unwrap(), Some(PhotoState::Placed));
        }

        assert!(booth.release(surface_w, surface_h).unwrap().is_none());
        assert_eq!(booth.snapshot().unwrap().placed.len(), 3);
    }

    #[tokio::test]
    async fn second_develop_is_rejected_while_first_runs() {
        let booth = slow_booth();
        booth.add_pending(source(20, 20, "one")).unwrap();
        booth.add_pending(source(20, 20, "two")).unwrap();

        let runner = booth.clone();
        let first = tokio::spawn(async move { runner.develop().await });
        wait_until_developing(&booth).await;

        let err = booth.develop().await.unwrap_err();
        assert!(matches!(err, BoothError::DevelopInProgress));
        let progress = booth.progress().unwrap();
        assert!((0.0..=1.0).contains(&progress));

        let report = first.await.unwrap().unwrap();
        assert_eq!(report.framed.len(), 2);
        assert_eq!(booth.queue_depth().unwrap(), 2);
        assert_eq!(booth.progress().unwrap(), 0.0);
        assert!(!booth.is_developing().unwrap());
    }

    #[tokio::test]
    async fn uploads_during_develop_wait_for_the_next_run() {
        let booth = slow_booth();
        let early = booth.add_pending(source(20, 20, "")).unwrap();

        let runner = booth.clone();
        let first = tokio::spawn(async move { runner.develop().await });
        wait_until_developing(&booth).await;
        let late = booth.add_pending(source(20, 20, "late")).unwrap();

        let report = first.await.unwrap().unwrap();
        assert_eq!(report.framed, vec![early]);
        assert_eq!(booth.state_of(late).unwrap(), Some(PhotoState::Pending));

        let report = booth.develop().await.unwrap();
        assert_eq!(report.framed, vec![late]);
    }

    #[tokio::test]
    async fn photos_removed_mid_run_are_withdrawn() {
        let booth = slow_booth();
        booth.add_pending(source(20, 20, "")).unwrap();
        let doomed = booth.add_pending(source(20, 20, "")).unwrap();

        let runner = booth.clone();
        let first = tokio::spawn(async move { runner.develop().await });
        wait_until_developing(&booth).await;
        assert!(booth.remove_pending(doomed).unwrap());

        let report = first.await.unwrap().unwrap();
        assert_eq!(report.withdrawn, vec![doomed]);
        assert_eq!(booth.queue_depth().unwrap(), 1);
    }

    #[tokio::test]
    async fn develop_with_nothing_pending_is_a_no_op() {
        let booth = booth();
        let report = booth.develop().await.unwrap();
        assert!(report.framed.is_empty() && report.failed.is_empty());
        assert_eq!(booth.queue_depth().unwrap(), 0);
    }

    #[tokio::test]
    async fn pacing_delay_does_not_change_results() {
        let mut config = config();
        config.develop.pacing_ms = 5;
        let booth = PhotoBooth::with_parts(
            config,
            Arc::new(plain_framer()),
            Box::new(SeededRandom::new(1)),
        )
        .unwrap();
        booth.add_pending(source(10, 10, "")).unwrap();
        booth.add_pending(source(10, 10, "")).unwrap();
        assert_eq!(booth.develop().await.unwrap().framed.len(), 2);
    }

    #[test]
    fn captions_only_change_while_pending() {
        let booth = booth();
        let id = booth.add_pending(source(10, 10, "before")).unwrap();
        booth.update_caption(id, "after").unwrap();
        booth.update_caption(PhotoId(999), "ignored").unwrap();

        let snapshot = booth.snapshot().unwrap();
        assert_eq!(snapshot.pending[0].caption, "after");
        assert_eq!(snapshot.pending[0].dimensions, Some((10, 10)));
    }

    #[test]
    fn removals_are_idempotent() {
        let booth = booth();
        let id = booth.add_pending(source(10, 10, "")).unwrap();
        assert!(booth.remove_pending(id).unwrap());
        assert!(!booth.remove_pending(id).unwrap());
        assert!(!booth.remove_placed(id).unwrap());
        assert_eq!(booth.state_of(id).unwrap(), Some(PhotoState::Removed));
        assert_eq!(booth.state_of(PhotoId(42)).unwrap(), None);
    }

    #[test]
    fn duplicate_uploads_get_distinct_ids() {
        let booth = booth();
        let photo = source(10, 10, "twin");
        let a = booth.add_pending(photo.clone()).unwrap();
        let b = booth.add_pending(photo).unwrap();
        assert_ne!(a, b);
        assert_eq!(booth.snapshot().unwrap().pending.len(), 2);
    }

    #[tokio::test]
    async fn surface_edits_go_through_the_spatial_model() {
        let booth = booth();
        let a = booth.add_pending(source(10, 10, "")).unwrap();
        let b = booth.add_pending(source(10, 10, "")).unwrap();
        booth.develop().await.unwrap();
        booth.release(800.0, 600.0).unwrap();
        booth.release(800.0, 600.0).unwrap();

        assert_eq!(booth.bring_to_front(a).unwrap(), Some(3));
        assert_eq!(
            booth
                .export_order()
                .unwrap()
                .iter()
                .map(PlacedItem::id)
                .collect::<Vec<_>>(),
            vec![b, a]
        );

        assert_eq!(booth.rescale(b, 5.0).unwrap(), Some(2.5));
        let nudged = booth.rescale(b, -0.1).unwrap().unwrap();
        assert!((nudged - 2.4).abs() < 1e-6);
        assert_eq!(booth.rescale(PhotoId(77), 0.1).unwrap(), None);
        assert_eq!(booth.bring_to_front(PhotoId(77)).unwrap(), None);

        assert!(booth.move_item(a, -500.0, 9000.0).unwrap());
        let moved = booth.export_order().unwrap().pop().unwrap();
        assert_eq!((moved.x, moved.y), (-500.0, 9000.0));

        assert!(booth.remove_placed(a).unwrap());
        assert!(!booth.remove_placed(a).unwrap());
        assert_eq!(booth.state_of(a).unwrap(), Some(PhotoState::Removed));
        assert!(booth.artifact(a).unwrap().is_none());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = config();
        config.framing.target_width = 0;
        let err = PhotoBooth::with_parts(
            config,
            Arc::new(plain_framer()),
            Box::new(SeededRandom::new(1)),
        )
        .unwrap_err();
        assert!(matches!(err, BoothError::Config(_)));
    }

    #[test]
    fn snapshot_serializes_without_bitmaps() {
        let booth = booth();
        booth.add_pending(source(10, 10, "cap")).unwrap();
        let json = serde_json::to_value(booth.snapshot().unwrap()).unwrap();
        assert_eq!(json["pending"][0]["caption"], "cap");
        assert_eq!(json["queue_depth"], 0);
        assert_eq!(json["developing"], false);
    }
}
