//! Plain-text tables for the terminal.

use fourier_engine::{ConvergenceMetrics, FourierCoefficients, HarmonicMask, SpectralLine};
use fourier_signal::WaveformKind;

pub fn print_waveforms() {
    println!("Available waveforms:");
    for kind in WaveformKind::ALL {
        println!("  {:<12} {:<28} {}", kind.name(), kind.title(), kind.formula());
    }
    println!();
    println!("pulse_train takes --duty (default 0.2); custom takes --expr in t.");
}

pub fn print_coefficients(coefficients: &FourierCoefficients, mask: &HarmonicMask) {
    println!("Coefficients:");
    println!("  a0 = {:.6}  (DC level {:.6})", coefficients.a0(), coefficients.dc_level());
    println!("  {:>3}  {:>12}  {:>12}", "k", "a[k]", "b[k]");
    for k in 1..=coefficients.harmonic_count() {
        let state = if mask.is_enabled(k) { "" } else { "  off" };
        println!(
            "  {:>3}  {:>12.6}  {:>12.6}{}",
            k,
            coefficients.a(k),
            coefficients.b(k),
            state
        );
    }
    println!();
}

pub fn print_spectrum(lines: &[SpectralLine]) {
    println!("Spectrum:");
    println!("  {:>3}  {:>12}  {:>10}", "k", "magnitude", "phase (°)");
    for line in lines {
        println!(
            "  {:>3}  {:>12.6}  {:>10.2}",
            line.harmonic, line.magnitude, line.phase_degrees
        );
    }
    println!();
}

pub fn print_convergence(metrics: &ConvergenceMetrics) {
    let last = metrics.final_point();
    println!("Convergence:");
    println!(
        "  {:>3}  {:>12}  {:>12}  {:>10}  {:>9}",
        "n", "rms error", "max error", "SNR (dB)", "power %"
    );
    for p in std::iter::once(&metrics.baseline).chain(&metrics.points) {
        println!(
            "  {:>3}  {:>12.3e}  {:>12.3e}  {:>10.2}  {:>9.3}",
            p.harmonics,
            p.rms_error,
            p.max_error,
            p.snr_db,
            p.power_capture_fraction * 100.0
        );
    }
    println!();
    println!("  RMS error      = {:.6}", last.rms_error);
    println!("  Max error      = {:.6}", last.max_error);
    println!("  Relative error = {:.4}", metrics.relative_error);
    println!("  SNR            = {:.2} dB", last.snr_db);
    println!("  Power captured = {:.3} %", last.power_capture_fraction * 100.0);
    for target in [0.95, 0.99] {
        match metrics.harmonics_for_capture(target) {
            Some(n) => println!("  {:.0} % power by n = {}", target * 100.0, n),
            None => println!("  {:.0} % power not reached", target * 100.0),
        }
    }
    println!("  THD            = {:.2} %", metrics.thd_percent);
    println!();
}
