use crate::detection::Detection;

/// Frame-indexed container of detections, densely indexed from frame 0.
#[derive(Clone, Debug, Default)]
pub struct DetectionSequence {
    frames: Vec<Vec<Detection>>,
}

impl DetectionSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a detection to its frame, extending the sequence so that the
    /// frame exists. Intermediate frames hold empty lists.
    pub fn add(&mut self, detection: Detection) {
        while detection.frame >= self.frames.len() {
            self.frames.push(Vec::new());
        }
        self.frames[detection.frame].push(detection);
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Detections observed in the given frame; frames past the end are empty.
    pub fn objects(&self, frame: usize) -> &[Detection] {
        self.frames.get(frame).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn object_count(&self, frame: usize) -> usize {
        self.objects(frame).len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.iter().all(Vec::is_empty)
    }
}
