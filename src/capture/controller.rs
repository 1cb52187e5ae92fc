use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::{mpsc, watch};
use url::Url;

use crate::capture::camera::{select_device, Camera, StreamRequest, VideoStream};
use crate::capture::decoder::{BarcodeDecoder, DecodeEvent, DecoderOptions};
use crate::capture::display::DisplaySurface;
use crate::config::ScannerConfig;
use crate::models::{DniRecord, SymbolFormat};
use crate::processing::PayloadParser;
use crate::submission::FormSubmission;
use crate::utils::{CameraFault, DniError, ParseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Requesting,
    Scanning,
    Decoded,
    Stopped,
    Failed,
}

/// How a scan session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Record(DniRecord),
    Rejected(ParseError),
    Stopped,
}

/// Requests a stop from outside the task that drives the controller.
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }
}

/// Owns the camera-to-decoder pipeline for one scanner and the state shown
/// to the user. At most one scan session is active at a time.
pub struct CaptureController<C, D, S>
where
    C: Camera,
    D: BarcodeDecoder,
    S: DisplaySurface,
{
    camera: C,
    decoder: D,
    display: S,
    parser: PayloadParser,
    options: DecoderOptions,
    request: StreamRequest,
    form: FormSubmission,
    state: ScanState,
    stream: Option<Box<dyn VideoStream>>,
    events: Option<mpsc::Receiver<DecodeEvent>>,
    record: Option<DniRecord>,
    stop_tx: Arc<watch::Sender<bool>>,
    stop_rx: watch::Receiver<bool>,
}

impl<C, D, S> CaptureController<C, D, S>
where
    C: Camera,
    D: BarcodeDecoder,
    S: DisplaySurface,
{
    pub fn new(camera: C, decoder: D, display: S, config: &ScannerConfig) -> Result<Self, DniError> {
        config.validate()?;
        let parser = PayloadParser::new(config.layout.resolve()?);
        let (stop_tx, stop_rx) = watch::channel(false);

        Ok(CaptureController {
            camera,
            decoder,
            display,
            parser,
            options: config.decoder_options(),
            request: StreamRequest {
                device_id: None,
                facing_mode: config.facing_mode,
            },
            form: config.form.clone(),
            state: ScanState::Idle,
            stream: None,
            events: None,
            record: None,
            stop_tx: Arc::new(stop_tx),
            stop_rx,
        })
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Most recent successfully parsed record.
    pub fn record(&self) -> Option<&DniRecord> {
        self.record.as_ref()
    }

    pub fn display(&self) -> &S {
        &self.display
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            tx: Arc::clone(&self.stop_tx),
        }
    }

    pub fn submission_url(&self) -> Result<Url, DniError> {
        let record = self.record.as_ref().ok_or(DniError::NoRecord)?;
        self.form.prefilled_url(record)
    }

    fn transition(&mut self, next: ScanState) {
        debug!("Scan state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Opens the camera and attaches the decoder. Failures are shown on the
    /// display, leave the controller idle and are not retried.
    pub async fn start(&mut self) -> Result<(), DniError> {
        if self.state != ScanState::Idle {
            warn!("Start requested while {:?}", self.state);
            return Err(DniError::ScanInProgress);
        }

        self.record = None;
        self.display.clear_record();
        self.display.set_submit_enabled(false);
        self.display.show_status("");
        self.display.set_scan_controls(true);
        self.display.set_loading(true);
        self.stop_tx.send_replace(false);
        self.stop_rx.borrow_and_update();
        self.transition(ScanState::Requesting);

        let mut stream = match self.open_camera().await {
            Ok(stream) => stream,
            Err(err) => {
                self.fail(&format!("Could not access the camera: {}", err));
                return Err(err);
            }
        };
        info!("Camera stream '{}' opened", stream.label());

        let events = match self.decoder.start(stream.as_ref(), &self.options).await {
            Ok(events) => events,
            Err(err) => {
                stream.release();
                self.decoder.reset();
                self.fail(&format!("Could not start the scanner: {}", err));
                return Err(err);
            }
        };

        self.stream = Some(stream);
        self.events = Some(events);
        self.transition(ScanState::Scanning);
        self.display.set_loading(false);
        self.display.show_status("Scanning...");
        Ok(())
    }

    async fn open_camera(&mut self) -> Result<Box<dyn VideoStream>, DniError> {
        let devices = self.camera.devices().await?;
        let device = select_device(&devices).ok_or(DniError::CameraUnavailable(CameraFault::NoCamera))?;
        debug!("Selected camera '{}' ({})", device.label, device.id);

        let request = StreamRequest {
            device_id: Some(device.id.clone()),
            facing_mode: self.request.facing_mode,
        };
        let stream = self.camera.open(&request).await?;
        self.request = request;
        Ok(stream)
    }

    fn fail(&mut self, message: &str) {
        self.transition(ScanState::Failed);
        self.display.set_loading(false);
        self.display.set_scan_controls(false);
        self.display.show_error(message);
        self.transition(ScanState::Idle);
    }

    /// Waits for the scan to produce something worth acting on.
    ///
    /// Frames without a symbol are skipped and decoder errors are shown while
    /// scanning continues. A stop request is honoured before any pending
    /// event. Returns [`ScanOutcome::Stopped`] when no scan is running.
    pub async fn next_outcome(&mut self) -> ScanOutcome {
        loop {
            if *self.stop_rx.borrow() {
                self.stop();
                return ScanOutcome::Stopped;
            }

            let events = match self.events.as_mut() {
                Some(events) if self.state == ScanState::Scanning => events,
                _ => return ScanOutcome::Stopped,
            };

            let event = tokio::select! {
                biased;
                _ = self.stop_rx.changed() => continue,
                event = events.recv() => event,
            };

            match event {
                Some(DecodeEvent::NotFound) => {}
                Some(DecodeEvent::Error(message)) => {
                    warn!("Decoder reported: {}", message);
                    self.display.show_error(&format!("Error: {}", message));
                }
                Some(DecodeEvent::Decoded { text, format }) => {
                    return self.handle_decoded(&text, format);
                }
                None => {
                    info!("Decoder finished without a result");
                    self.stop();
                    return ScanOutcome::Stopped;
                }
            }
        }
    }

    /// `start` followed by `next_outcome`.
    pub async fn scan(&mut self) -> Result<ScanOutcome, DniError> {
        self.start().await?;
        Ok(self.next_outcome().await)
    }

    fn handle_decoded(&mut self, text: &str, format: SymbolFormat) -> ScanOutcome {
        self.transition(ScanState::Decoded);
        self.release_resources();
        self.display.set_loading(false);
        self.display.set_scan_controls(false);
        info!("Decoded {} symbol ({} bytes)", format, text.len());

        let outcome = match self.parser.parse(text, &format) {
            Ok(record) => {
                self.display.show_record(&record);
                self.display.set_submit_enabled(true);
                self.display.show_status(&format!(
                    "DNI ({}) scanned. Check the data before submitting.",
                    format
                ));
                self.record = Some(record.clone());
                ScanOutcome::Record(record)
            }
            Err(err) => {
                warn!("Rejected {} payload: {}", format, err);
                self.record = None;
                self.display.clear_record();
                self.display.set_submit_enabled(false);
                let message = match &err {
                    ParseError::UnsupportedSymbolFormat(_) => "Unsupported format.".to_string(),
                    ParseError::MalformedPayload(_) => {
                        format!("The {} code is not a valid Argentine DNI.", format)
                    }
                };
                self.display.show_error(&message);
                ScanOutcome::Rejected(err)
            }
        };

        self.transition(ScanState::Idle);
        outcome
    }

    /// Releases the camera and decoder. Safe to call in any state.
    pub fn stop(&mut self) {
        let was_active = self.release_resources() || self.state != ScanState::Idle;
        if !was_active {
            return;
        }
        self.transition(ScanState::Stopped);
        self.display.set_loading(false);
        self.display.set_scan_controls(false);
        self.display.show_status("Scan stopped.");
        self.transition(ScanState::Idle);
    }

    fn release_resources(&mut self) -> bool {
        let mut released = false;
        if let Some(events) = self.events.take() {
            drop(events);
            self.decoder.reset();
            released = true;
        }
        if let Some(mut stream) = self.stream.take() {
            stream.release();
            debug!("Camera stream '{}' released", stream.label());
            released = true;
        }
        released
    }
}

impl<C, D, S> Drop for CaptureController<C, D, S>
where
    C: Camera,
    D: BarcodeDecoder,
    S: DisplaySurface,
{
    fn drop(&mut self) {
        self.release_resources();
    }
}
