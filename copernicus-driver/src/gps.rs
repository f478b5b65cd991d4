//! Copernicus receiver engine
//!
//! [`CopernicusGps`] pulls TSIP packets off the link, decodes the reports it
//! knows into latest-value records, and hands everything else to registered
//! [`PacketProcessor`]s.
//!
//! Two ways to drive it:
//!
//! ```ignore
//! // From an idle loop or a serial interrupt: take whatever has arrived
//! loop {
//!     match gps.drain_one(false) {
//!         ReportType::None => break,
//!         ReportType::PositionLlaSingle => update_map(gps.position_fix()),
//!         _ => {}
//!     }
//! }
//!
//! // Or stall until a particular report turns up
//! gps.wait_for(Some(ReportType::GpsTime));
//! ```
//!
//! I/O options replies (0x55) are decoded even when nobody asked for them,
//! so [`CopernicusGps::io_options`] follows changes made by other hosts.
//!
//! A packet whose header has been accepted is always decoded to the end
//! before control returns, so the records are never observed half-written.

use copernicus_hal::ByteTransport;
use copernicus_protocol::decode::{self, Underrun};
use copernicus_protocol::records::INVALID_TIME;
use copernicus_protocol::{
    GpsHealth, GpsStatus, GpsTime, IoOptions, Link, LinkState, PositionFix, ReportType,
    SatelliteSelection, VelocityFix,
};

use crate::error::ListenerError;
use crate::listener::{ListenerRegistry, PacketProcessor, PacketStatus};

/// TSIP engine for a Copernicus receiver on transport `T`
///
/// `'a` bounds the packet processors registered with the engine.
pub struct CopernicusGps<'a, T: ByteTransport + 'a> {
    pub(crate) link: Link<T>,
    position: PositionFix,
    velocity: VelocityFix,
    time: GpsTime,
    status: GpsStatus,
    satellites: SatelliteSelection,
    pub(crate) io_options: Option<IoOptions>,
    listeners: ListenerRegistry<'a, T>,
}

impl<'a, T: ByteTransport + 'a> CopernicusGps<'a, T> {
    /// Create an engine reading from `transport`
    ///
    /// All records start out empty: no fixes, invalid time, unknown health.
    pub fn new(transport: T) -> Self {
        Self {
            link: Link::new(transport),
            position: PositionFix::None,
            velocity: VelocityFix::None,
            time: GpsTime::default(),
            status: GpsStatus::default(),
            satellites: SatelliteSelection::default(),
            io_options: None,
            listeners: ListenerRegistry::new(),
        }
    }

    /// Process one packet from the stream
    ///
    /// Without `block`, returns [`ReportType::None`] as soon as no packet
    /// header is available. Once a header is found the packet is always
    /// processed to completion. Returns the type of the packet handled, or
    /// [`ReportType::Error`] if it could not be decoded.
    pub fn drain_one(&mut self, block: bool) -> ReportType {
        self.step(block, None)
    }

    /// Process packets until a report of type `target` arrives
    ///
    /// Reports that arrive first are decoded as usual. The wanted packet is
    /// left with only its header consumed, so the caller reads the payload
    /// with [`CopernicusGps::read_data`] and [`CopernicusGps::end_report`].
    /// With no target (or a sentinel type with no wire id) this never
    /// returns.
    pub fn wait_for(&mut self, target: Option<ReportType>) {
        let halt_at = target.and_then(ReportType::id);
        loop {
            let report = self.step(true, halt_at);
            if halt_at.is_some() && report.id() == halt_at {
                return;
            }
        }
    }

    fn step(&mut self, block: bool, halt_at: Option<u8>) -> ReportType {
        if self.link.state() == LinkState::Resync {
            debug!("resynchronizing to next packet boundary");
        }
        let Some(id) = self.link.next_report(block) else {
            return ReportType::None;
        };
        if Some(id) == halt_at {
            trace!("halting at report {=u8:#x}", id);
            return ReportType::from_id(id);
        }

        let report = ReportType::from_id(id);
        let decoded = match report {
            ReportType::PositionLlaSingle => {
                let fix = decode::lla_fix(&mut self.link).map(PositionFix::LlaSingle);
                self.store_position(fix)
            }
            ReportType::PositionLlaDouble => {
                let fix = decode::lla_fix(&mut self.link).map(PositionFix::LlaDouble);
                self.store_position(fix)
            }
            ReportType::PositionXyzSingle => {
                let fix = decode::xyz_fix(&mut self.link).map(PositionFix::XyzSingle);
                self.store_position(fix)
            }
            ReportType::PositionXyzDouble => {
                let fix = decode::xyz_fix(&mut self.link).map(PositionFix::XyzDouble);
                self.store_position(fix)
            }
            ReportType::VelocityXyz => {
                let fix = decode::velocity_xyz(&mut self.link).map(VelocityFix::Xyz);
                self.store_velocity(fix)
            }
            ReportType::VelocityEnu => {
                let fix = decode::velocity_enu(&mut self.link).map(VelocityFix::Enu);
                self.store_velocity(fix)
            }
            ReportType::GpsTime => match decode::gps_time(&mut self.link) {
                Ok(time) => {
                    self.time = time;
                    Ok(())
                }
                Err(e) => {
                    self.time.time_of_week = INVALID_TIME;
                    Err(e)
                }
            },
            ReportType::Health => match decode::health(&mut self.link) {
                Ok(health) => {
                    self.status.health = health;
                    Ok(())
                }
                Err(e) => {
                    self.status.health = GpsHealth::Unknown;
                    Err(e)
                }
            },
            ReportType::AdditionalStatus => decode::additional_status(&mut self.link).map(|flags| {
                self.status.rtclock_unavailable = flags.rtclock_unavailable;
                self.status.almanac_incomplete = flags.almanac_incomplete;
            }),
            ReportType::SbasMode => decode::sbas_mode(&mut self.link).map(|flags| {
                self.status.sbas_corrected = flags.corrected;
                self.status.sbas_enabled = flags.enabled;
            }),
            ReportType::Satellites => {
                decode::satellite_selection(&mut self.link).map(|selection| {
                    self.status.n_satellites = selection.prns.len() as u8;
                    self.satellites = selection;
                })
            }
            ReportType::IoSettings => decode::io_options(&mut self.link).map(|options| {
                self.io_options = Some(options);
            }),
            _ => return self.offer_to_listeners(id, block),
        };

        match decoded {
            Ok(()) => report,
            Err(Underrun) => {
                warn!("report {=u8:#x} ended early", id);
                ReportType::Error
            }
        }
    }

    fn store_position(&mut self, fix: Result<PositionFix, Underrun>) -> Result<(), Underrun> {
        self.position = fix.unwrap_or(PositionFix::Error);
        fix.map(|_| ())
    }

    fn store_velocity(&mut self, fix: Result<VelocityFix, Underrun>) -> Result<(), Underrun> {
        self.velocity = fix.unwrap_or(VelocityFix::Error);
        fix.map(|_| ())
    }

    fn offer_to_listeners(&mut self, id: u8, block: bool) -> ReportType {
        match self.listeners.dispatch(id, &mut self.link) {
            PacketStatus::Consumed => {}
            PacketStatus::Ignore => {
                trace!("discarding unclaimed report {=u8:#x}", id);
                self.link.skip_packet(block);
            }
            PacketStatus::Partial => {
                self.link.skip_packet(block);
            }
            PacketStatus::Error => {
                warn!("processor failed on report {=u8:#x}", id);
                self.link.skip_packet(block);
                return ReportType::Error;
            }
        }
        ReportType::from_id(id)
    }

    /// Read decoded payload of the current packet
    ///
    /// For use after [`CopernicusGps::wait_for`] halts at a header. Returns
    /// the number of bytes read; fewer than `dst.len()` means the packet
    /// ended early.
    pub fn read_data(&mut self, dst: &mut [u8]) -> usize {
        self.link.read_data(dst)
    }

    /// Consume the end of the current packet
    ///
    /// Returns `false` if the packet does not end here.
    pub fn end_report(&mut self) -> bool {
        self.link.end_report()
    }

    /// Most recent position fix
    pub fn position_fix(&self) -> &PositionFix {
        &self.position
    }

    /// Most recent velocity fix
    pub fn velocity_fix(&self) -> &VelocityFix {
        &self.velocity
    }

    /// GPS time as of the last PPS pulse
    pub fn gps_time(&self) -> &GpsTime {
        &self.time
    }

    /// Receiver health and status flags
    ///
    /// `status().health == GpsHealth::DoingFixes` once the receiver has a lock.
    pub fn status(&self) -> &GpsStatus {
        &self.status
    }

    /// Satellites used in the current fix
    pub fn satellites(&self) -> &SatelliteSelection {
        &self.satellites
    }

    /// I/O options from the last 0x55 reply, if one has been seen
    pub fn io_options(&self) -> Option<IoOptions> {
        self.io_options
    }

    /// Register a processor for reports the engine does not decode
    pub fn add_listener(
        &mut self,
        processor: &'a dyn PacketProcessor<T>,
    ) -> Result<(), ListenerError> {
        self.listeners.add(processor)
    }

    /// Stop offering reports to a processor
    pub fn remove_listener(&mut self, processor: &dyn PacketProcessor<T>) {
        self.listeners.remove(processor);
    }

    /// Number of registered processors
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Get a reference to the transport
    pub fn transport(&self) -> &T {
        self.link.transport()
    }

    /// Get a mutable reference to the transport
    pub fn transport_mut(&mut self) -> &mut T {
        self.link.transport_mut()
    }

    /// Release the transport
    pub fn into_transport(self) -> T {
        self.link.into_transport()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use copernicus_hal::BufferTransport;
    use copernicus_protocol::frame::{encode_to_vec, DLE, ETX};
    use copernicus_protocol::{Float32, Float64, Link};
    use core::cell::RefCell;
    use heapless::Vec;

    type TestTransport = BufferTransport<512, 64>;

    fn packet(id: u8, payload: &[u8]) -> Vec<u8, 128> {
        encode_to_vec(id, payload).unwrap()
    }

    fn be32(words: &[u32]) -> Vec<u8, 64> {
        let mut out = Vec::new();
        for w in words {
            out.extend_from_slice(&w.to_be_bytes()).unwrap();
        }
        out
    }

    fn engine<'a>(chunks: &[&[u8]]) -> CopernicusGps<'a, TestTransport> {
        let mut transport = TestTransport::new();
        for chunk in chunks {
            transport.feed(chunk).unwrap();
        }
        CopernicusGps::new(transport)
    }

    const LLA_WORDS: [u32; 5] = [0x3F00_0000, 0xBF40_0000, 0x4248_0000, 0x4080_0000, 0x42C8_0000];

    #[test]
    fn test_initial_records() {
        let gps = engine(&[]);
        assert_eq!(gps.position_fix().report_type(), ReportType::None);
        assert_eq!(gps.velocity_fix().report_type(), ReportType::None);
        assert!(!gps.gps_time().is_valid());
        assert_eq!(gps.status().health, GpsHealth::Unknown);
    }

    #[test]
    fn test_drain_empty() {
        let mut gps = engine(&[]);
        assert_eq!(gps.drain_one(false), ReportType::None);
    }

    #[test]
    fn test_lla_single_fix() {
        let payload = be32(&LLA_WORDS);
        let mut gps = engine(&[&[DLE, 0x4A], &payload, &[DLE, ETX]]);

        assert_eq!(gps.drain_one(false), ReportType::PositionLlaSingle);

        let fix = gps.position_fix().lla_single().unwrap();
        assert_eq!(fix.lat.bits(), LLA_WORDS[0]);
        assert_eq!(fix.lng.bits(), LLA_WORDS[1]);
        assert_eq!(fix.alt.bits(), LLA_WORDS[2]);
        assert_eq!(fix.bias.bits(), LLA_WORDS[3]);
        assert_eq!(fix.fix_time.bits(), LLA_WORDS[4]);
        assert!(gps.position_fix().xyz_single().is_none());

        assert_eq!(gps.drain_one(false), ReportType::None);
    }

    #[test]
    fn test_double_precision_fixes() {
        let mut payload = Vec::<u8, 64>::new();
        for v in [1.5f64, -0.25, 6_371_000.0, 1e-9] {
            payload.extend_from_slice(&v.to_bits().to_be_bytes()).unwrap();
        }
        payload.extend_from_slice(&10.0f32.to_bits().to_be_bytes()).unwrap();
        let mut gps = engine(&[&packet(0x84, &payload), &packet(0x83, &payload)]);

        assert_eq!(gps.drain_one(false), ReportType::PositionLlaDouble);
        let lla = gps.position_fix().lla_double().unwrap();
        assert_eq!(lla.lat, Float64::from(1.5));
        assert_eq!(lla.alt, Float64::from(6_371_000.0));
        assert_eq!(lla.fix_time, Float32::from(10.0));

        assert_eq!(gps.drain_one(false), ReportType::PositionXyzDouble);
        let xyz = gps.position_fix().xyz_double().unwrap();
        assert_eq!(xyz.y, Float64::from(-0.25));
        assert_eq!(xyz.bias, Float64::from(1e-9));
        assert!(gps.position_fix().lla_double().is_none());
    }

    #[test]
    fn test_payload_with_escaped_dle() {
        // Every word carries at least one 0x10 byte that is doubled on the wire
        let words = [0x1010_1010, 0x4000_0010, 0xC110_0000, 0x0000_1000, 0x4120_1000];
        let mut gps = engine(&[&packet(0x42, &be32(&words))]);

        assert_eq!(gps.drain_one(false), ReportType::PositionXyzSingle);
        let fix = gps.position_fix().xyz_single().unwrap();
        assert_eq!(fix.x.bits(), words[0]);
        assert_eq!(fix.y.bits(), words[1]);
        assert_eq!(fix.z.bits(), words[2]);
        assert_eq!(fix.bias.bits(), words[3]);
        assert_eq!(fix.fix_time.bits(), words[4]);
    }

    #[test]
    fn test_velocity_reports() {
        let xyz_words = [0x3F80_0000, 0x4000_0000, 0x4040_0000, 0x3A83_126F, 0x4120_0000];
        let enu_words = [0xBF80_0000, 0x8000_0000, 0x3F00_0000, 0xBA83_126F, 0x4130_0000];
        let mut gps = engine(&[&packet(0x43, &be32(&xyz_words)), &packet(0x56, &be32(&enu_words))]);

        assert_eq!(gps.drain_one(false), ReportType::VelocityXyz);
        let fix = gps.velocity_fix().xyz().unwrap();
        assert_eq!(fix.x.bits(), xyz_words[0]);
        assert_eq!(fix.y.bits(), xyz_words[1]);
        assert_eq!(fix.z.bits(), xyz_words[2]);
        assert_eq!(fix.bias.bits(), xyz_words[3]);
        assert_eq!(fix.fix_time.bits(), xyz_words[4]);

        assert_eq!(gps.drain_one(false), ReportType::VelocityEnu);
        let fix = gps.velocity_fix().enu().unwrap();
        assert_eq!(fix.e.bits(), enu_words[0]);
        assert_eq!(fix.n.bits(), enu_words[1]);
        assert_eq!(fix.u.bits(), enu_words[2]);
        assert_eq!(fix.bias.bits(), enu_words[3]);
        assert_eq!(fix.fix_time.bits(), enu_words[4]);
        assert!(gps.velocity_fix().xyz().is_none());
    }

    #[test]
    fn test_time_and_status_reports() {
        let time = [0x48, 0x93, 0xE0, 0x00, 0x08, 0x2B, 0x41, 0x90, 0x00, 0x00];
        let mut gps = engine(&[
            &packet(0x41, &time),
            &packet(0x46, &[0x00, 0x00]),
            &packet(0x4B, &[0x5A, 0x00, 0x00]),
            &packet(0x82, &[0x03]),
        ]);

        assert_eq!(gps.drain_one(false), ReportType::GpsTime);
        assert_eq!(gps.gps_time().time_of_week.to_f32(), 302848.0);
        assert_eq!(gps.gps_time().week_no, 2091);
        assert_eq!(gps.gps_time().utc_offset.to_f32(), 18.0);

        assert_eq!(gps.drain_one(false), ReportType::Health);
        assert_eq!(gps.status().health, GpsHealth::DoingFixes);

        assert_eq!(gps.drain_one(false), ReportType::AdditionalStatus);
        assert!(!gps.status().almanac_incomplete);
        assert!(!gps.status().rtclock_unavailable);

        assert_eq!(gps.drain_one(false), ReportType::SbasMode);
        assert!(gps.status().sbas_enabled);
        assert!(gps.status().sbas_corrected);
    }

    #[test]
    fn test_satellite_report() {
        let mut payload = Vec::<u8, 32>::new();
        payload.push(0x34).unwrap();
        payload
            .extend_from_slice(&be32(&[0x4000_0000, 0x3F80_0000, 0x3F80_0000, 0x3F80_0000]))
            .unwrap();
        payload.extend_from_slice(&[2, 16, 31]).unwrap();
        let mut gps = engine(&[&packet(0x6D, &payload)]);

        assert_eq!(gps.drain_one(false), ReportType::Satellites);
        assert_eq!(gps.status().n_satellites, 3);
        assert_eq!(gps.satellites().prns.as_slice(), &[2, 16, 31]);
        assert_eq!(gps.satellites().pdop.to_f32(), 2.0);
    }

    #[test]
    fn test_truncated_packet_recovers() {
        let payload = be32(&LLA_WORDS);
        let mut gps = engine(&[
            &[DLE, 0x4A],
            &payload[..18],
            &packet(0x4A, &payload),
        ]);

        assert_eq!(gps.drain_one(false), ReportType::Error);
        assert_eq!(*gps.position_fix(), PositionFix::Error);

        assert_eq!(gps.drain_one(false), ReportType::PositionLlaSingle);
        assert_eq!(gps.position_fix().lla_single().unwrap().fix_time.bits(), LLA_WORDS[4]);
    }

    #[test]
    fn test_missing_trailer() {
        // Full payload, then garbage instead of DLE ETX
        let payload = be32(&LLA_WORDS);
        let mut gps = engine(&[
            &[DLE, 0x4A],
            &payload,
            &[0x55, 0x66, DLE, ETX],
            &packet(0x46, &[0x00, 0x08]),
        ]);

        assert_eq!(gps.drain_one(false), ReportType::Error);
        assert!(!gps.position_fix().is_valid());
        assert_eq!(gps.drain_one(false), ReportType::Health);
        assert_eq!(gps.status().health, GpsHealth::NoSatellites);
    }

    #[test]
    fn test_fix_families_fail_independently() {
        let lla = be32(&LLA_WORDS);
        let mut gps = engine(&[
            &packet(0x4A, &lla),
            &packet(0x43, &[0x00, 0x01, 0x02]),
        ]);

        assert_eq!(gps.drain_one(false), ReportType::PositionLlaSingle);
        assert_eq!(gps.drain_one(false), ReportType::Error);

        assert_eq!(*gps.velocity_fix(), VelocityFix::Error);
        assert!(gps.position_fix().lla_single().is_some());
    }

    #[test]
    fn test_time_failure_invalidates_time() {
        let time = [0x48, 0x93, 0xE0, 0x00, 0x08, 0x2B, 0x41, 0x90, 0x00, 0x00];
        let mut gps = engine(&[&packet(0x41, &time), &packet(0x41, &time[..5])]);

        assert_eq!(gps.drain_one(false), ReportType::GpsTime);
        assert!(gps.gps_time().is_valid());

        assert_eq!(gps.drain_one(false), ReportType::Error);
        assert_eq!(gps.gps_time().time_of_week, INVALID_TIME);
    }

    #[test]
    fn test_health_failure_resets_health() {
        let mut gps = engine(&[&packet(0x46, &[0x00, 0x00]), &packet(0x46, &[0x00])]);

        assert_eq!(gps.drain_one(false), ReportType::Health);
        assert_eq!(gps.drain_one(false), ReportType::Error);
        assert_eq!(gps.status().health, GpsHealth::Unknown);
    }

    #[test]
    fn test_status_flags_kept_on_failure() {
        let mut gps = engine(&[
            &packet(0x4B, &[0x5A, 0x00, 0x00]),
            &packet(0x4B, &[0x5A, 0x0A]),
            &packet(0x82, &[0x03]),
            &packet(0x82, &[]),
        ]);

        assert_eq!(gps.drain_one(false), ReportType::AdditionalStatus);
        assert_eq!(gps.drain_one(false), ReportType::Error);
        assert!(!gps.status().almanac_incomplete);
        assert!(!gps.status().rtclock_unavailable);

        assert_eq!(gps.drain_one(false), ReportType::SbasMode);
        assert_eq!(gps.drain_one(false), ReportType::Error);
        assert!(gps.status().sbas_enabled);
        assert!(gps.status().sbas_corrected);
    }

    #[test]
    fn test_unsolicited_io_settings() {
        let reader = Reader::new(0x55, 4, true, PacketStatus::Consumed);
        let mut gps = engine(&[
            &packet(0x55, &[0x12, 0x02, 0x20, DLE]),
            &packet(0x55, &[0x02, 0x01]),
        ]);
        gps.add_listener(&reader).unwrap();
        assert_eq!(gps.io_options(), None);

        assert_eq!(gps.drain_one(false), ReportType::IoSettings);
        let options = gps.io_options().unwrap();
        assert_eq!(options.to_bytes(), [0x12, 0x02, 0x20, DLE]);
        assert!(reader.seen.borrow().is_empty());

        // A short reply keeps the last good options
        assert_eq!(gps.drain_one(false), ReportType::Error);
        assert_eq!(gps.io_options(), Some(options));
    }

    #[test]
    fn test_resync_after_garbage() {
        let mut gps = engine(&[
            &[0x00, 0xFF, 0x12],
            // tail of a packet we joined halfway: escaped DLE, then DLE ETX
            &[DLE, DLE, 0x20, DLE, ETX],
            // empty packet
            &[DLE, ETX],
            &packet(0x82, &[0x02]),
        ]);

        assert_eq!(gps.drain_one(false), ReportType::SbasMode);
        assert!(gps.status().sbas_enabled);
        assert!(!gps.status().sbas_corrected);
    }

    #[test]
    fn test_unclaimed_report_discarded() {
        let mut gps = engine(&[
            &packet(0x8F, &[0x20, DLE, 0x01, ETX]),
            &packet(0x46, &[0x00, 0x00]),
        ]);

        assert_eq!(gps.drain_one(false), ReportType::Unknown(0x8F));
        assert_eq!(gps.drain_one(false), ReportType::Health);
    }

    #[test]
    fn test_non_blocking_discard_resumes() {
        let mut gps = engine(&[&[DLE, 0x8F, 0x01, DLE, DLE]]);

        assert_eq!(gps.drain_one(false), ReportType::Unknown(0x8F));
        assert_eq!(gps.drain_one(false), ReportType::None);

        // The rest of the unknown packet contains DLE 0x4A, which must not be
        // taken for a header
        gps.transport_mut().feed(&[0x4A, DLE, ETX]).unwrap();
        gps.transport_mut().feed(&packet(0x46, &[0x00, 0x01])).unwrap();
        assert_eq!(gps.drain_one(false), ReportType::Health);
        assert_eq!(gps.status().health, GpsHealth::NoGpsTime);
    }

    /// Reads a fixed number of payload bytes, then answers with `status`
    struct Reader {
        report: u8,
        take: usize,
        finish: bool,
        status: PacketStatus,
        seen: RefCell<Vec<u8, 16>>,
    }

    impl Reader {
        fn new(report: u8, take: usize, finish: bool, status: PacketStatus) -> Self {
            Self {
                report,
                take,
                finish,
                status,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl PacketProcessor<TestTransport> for Reader {
        fn process_packet(&self, report: u8, link: &mut Link<TestTransport>) -> PacketStatus {
            if report != self.report {
                return PacketStatus::Ignore;
            }
            let mut buf = [0u8; 16];
            let n = link.read_data(&mut buf[..self.take]);
            self.seen.borrow_mut().extend_from_slice(&buf[..n]).unwrap();
            if self.finish && !link.end_report() {
                return PacketStatus::Error;
            }
            self.status
        }
    }

    #[test]
    fn test_listener_partial_read() {
        let reader = Reader::new(0x8F, 2, false, PacketStatus::Partial);
        let mut gps = engine(&[
            &packet(0x8F, &[0x01, 0x02, 0x03, DLE, 0x04]),
            &packet(0x46, &[0x00, 0x00]),
        ]);
        gps.add_listener(&reader).unwrap();

        assert_eq!(gps.drain_one(false), ReportType::Unknown(0x8F));
        assert_eq!(reader.seen.borrow().as_slice(), &[0x01, 0x02]);
        assert_eq!(gps.drain_one(false), ReportType::Health);
    }

    #[test]
    fn test_listener_consumes_packet() {
        let reader = Reader::new(0x8F, 3, true, PacketStatus::Consumed);
        let mut gps = engine(&[
            &packet(0x8F, &[DLE, 0x02, 0x03]),
            &packet(0x8F, &[0x04, 0x05, 0x06]),
        ]);
        gps.add_listener(&reader).unwrap();

        assert_eq!(gps.drain_one(false), ReportType::Unknown(0x8F));
        assert_eq!(gps.drain_one(false), ReportType::Unknown(0x8F));
        assert_eq!(
            reader.seen.borrow().as_slice(),
            &[DLE, 0x02, 0x03, 0x04, 0x05, 0x06]
        );
        assert_eq!(gps.drain_one(false), ReportType::None);
    }

    #[test]
    fn test_listener_error() {
        // Expects a trailer after 1 byte, packet is longer
        let reader = Reader::new(0x8F, 1, true, PacketStatus::Consumed);
        let mut gps = engine(&[
            &packet(0x8F, &[0x01, 0x02, 0x03]),
            &packet(0x46, &[0x00, 0x00]),
        ]);
        gps.add_listener(&reader).unwrap();

        assert_eq!(gps.drain_one(false), ReportType::Error);
        assert_eq!(gps.drain_one(false), ReportType::Health);
    }

    #[test]
    fn test_listener_not_offered_known_reports() {
        let reader = Reader::new(0x46, 2, true, PacketStatus::Consumed);
        let mut gps = engine(&[&packet(0x46, &[0x00, 0x0B])]);
        gps.add_listener(&reader).unwrap();

        assert_eq!(gps.drain_one(false), ReportType::Health);
        assert!(reader.seen.borrow().is_empty());
        assert_eq!(gps.status().health, GpsHealth::ThreeSatellites);
    }

    #[test]
    fn test_listener_registration() {
        let a = Reader::new(0x8F, 0, false, PacketStatus::Ignore);
        let b = Reader::new(0x8F, 0, false, PacketStatus::Ignore);
        let mut gps = engine(&[]);

        gps.add_listener(&a).unwrap();
        gps.add_listener(&a).unwrap();
        gps.add_listener(&b).unwrap();
        assert_eq!(gps.listener_count(), 2);

        gps.remove_listener(&a);
        assert_eq!(gps.listener_count(), 1);
    }

    #[test]
    fn test_wait_for_decodes_other_reports() {
        let time = [0x48, 0x93, 0xE0, 0x00, 0x08, 0x2B, 0x41, 0x90, 0x00, 0x00];
        let mut gps = engine(&[
            &packet(0x41, &time),
            &packet(0x8F, &[0x01]),
            &packet(0x46, &[0x00, 0x04]),
            &packet(0x82, &[0x01]),
        ]);

        gps.wait_for(Some(ReportType::Health));

        // Earlier reports were processed, the health payload was not
        assert!(gps.gps_time().is_valid());
        assert_eq!(gps.status().health, GpsHealth::Unknown);

        let mut buf = [0u8; 2];
        assert_eq!(gps.read_data(&mut buf), 2);
        assert_eq!(buf, [0x00, 0x04]);
        assert!(gps.end_report());

        assert_eq!(gps.drain_one(false), ReportType::SbasMode);
    }

    #[test]
    fn test_wait_for_blocks_until_complete() {
        let payload = be32(&LLA_WORDS);
        let mut gps = engine(&[&packet(0x4A, &payload), &[DLE, 0x55]]);

        gps.wait_for(Some(ReportType::IoSettings));
        assert!(gps.position_fix().is_valid());
        assert_eq!(gps.transport().pending(), 0);
    }
}
