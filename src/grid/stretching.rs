//! Gridline configuration of a Cartesian mesh
//!
//! A direction is described by a start point and a list of
//! sub-domains `(end, cells, stretchRatio)`. Inside a sub-domain the
//! cell widths follow a geometric progression with ratio `stretchRatio`
//! (uniform for a ratio of one).
//!
//! [`Segment`] is the higher-level description used to build meshes:
//! a segment is either uniform, or stretched from a given width until a
//! maximum width is reached, and is converted into one or two
//! sub-domains.
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sub-domain of a gridline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubDomain {
    /// End of the sub-domain
    pub end: f64,
    /// Number of cells
    pub cells: usize,
    /// Ratio between the widths of two consecutive cells
    #[serde(rename = "stretchRatio")]
    pub stretch_ratio: f64,
}

/// Gridline configuration along one direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridlineConfig {
    /// Direction (`x`, `y` or `z`)
    pub direction: String,
    /// First gridline
    pub start: f64,
    /// Sub-domains, in increasing order
    #[serde(rename = "subDomains")]
    pub sub_domains: Vec<SubDomain>,
}

/// Portion of a gridline described by its target cell width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Start of the segment
    pub start: f64,
    /// End of the segment
    pub end: f64,
    /// Uniform width, or the width of the first stretched cell
    pub width: f64,
    /// Stretching ratio (1 for uniform)
    pub stretch_ratio: f64,
    /// Width at which stretching stops
    pub max_width: f64,
    /// Stretch from the end towards the start
    pub reverse: bool,
}

impl Segment {
    /// Uniform segment
    pub fn uniform(start: f64, end: f64, width: f64) -> Self {
        Self {
            start,
            end,
            width,
            stretch_ratio: 1.0,
            max_width: width,
            reverse: false,
        }
    }

    /// Stretched segment
    pub fn stretched(
        start: f64,
        end: f64,
        width: f64,
        stretch_ratio: f64,
        max_width: f64,
        reverse: bool,
    ) -> Self {
        assert!(
            stretch_ratio >= 1.0,
            "Stretch ratio must be at least 1, got {}.",
            stretch_ratio
        );
        Self {
            start,
            end,
            width,
            stretch_ratio,
            max_width,
            reverse,
        }
    }

    /// Length of the segment
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    /// Sub-domains reproducing the segment
    pub fn sub_domains(&self) -> Vec<SubDomain> {
        let length = self.length();
        assert!(length > 0.0, "Segment must have a positive length.");
        if (self.stretch_ratio - 1.0).abs() < 1e-12 {
            let cells = ((length / self.width).round() as usize).max(1);
            return vec![SubDomain {
                end: self.end,
                cells,
                stretch_ratio: 1.0,
            }];
        }

        // geometric part
        let r = self.stretch_ratio;
        let (mut n, mut covered, mut w) = (0, 0.0, self.width);
        while w < self.max_width && covered + w <= length * (1.0 + 1e-12) {
            covered += w;
            w *= r;
            n += 1;
        }
        let covered = covered.min(length);
        let remainder = length - covered;
        let n_uniform = if remainder > 1e-12 * length {
            ((remainder / self.max_width).ceil() as usize).max(1)
        } else {
            0
        };

        let mut domains = Vec::new();
        if self.reverse {
            if n_uniform > 0 {
                domains.push(SubDomain {
                    end: self.start + remainder,
                    cells: n_uniform,
                    stretch_ratio: 1.0,
                });
            }
            if n > 0 {
                domains.push(SubDomain {
                    end: self.end,
                    cells: n,
                    stretch_ratio: 1.0 / r,
                });
            }
        } else {
            if n > 0 {
                domains.push(SubDomain {
                    end: self.start + covered,
                    cells: n,
                    stretch_ratio: r,
                });
            }
            if n_uniform > 0 {
                domains.push(SubDomain {
                    end: self.end,
                    cells: n_uniform,
                    stretch_ratio: 1.0,
                });
            }
        }
        if let Some(last) = domains.last_mut() {
            last.end = self.end;
        }
        domains
    }
}

impl GridlineConfig {
    /// Configuration from contiguous segments
    pub fn from_segments(direction: &str, segments: &[Segment]) -> Self {
        assert!(!segments.is_empty(), "Need at least one segment.");
        for pair in segments.windows(2) {
            assert!(
                (pair[0].end - pair[1].start).abs() < 1e-12,
                "Segments are not contiguous: {} != {}.",
                pair[0].end,
                pair[1].start
            );
        }
        Self {
            direction: direction.to_string(),
            start: segments[0].start,
            sub_domains: segments.iter().flat_map(Segment::sub_domains).collect(),
        }
    }

    /// Round the locations to `ndigits` decimals
    pub fn rounded(mut self, ndigits: i32) -> Self {
        let scale = 10f64.powi(ndigits);
        let round = |v: f64| (v * scale).round() / scale;
        self.start = round(self.start);
        for domain in self.sub_domains.iter_mut() {
            domain.end = round(domain.end);
            domain.stretch_ratio = round(domain.stretch_ratio);
        }
        self
    }

    /// Number of cells
    pub fn cells(&self) -> usize {
        self.sub_domains.iter().map(|d| d.cells).sum()
    }

    /// Gridlines (number of cells + 1 points)
    pub fn gridlines(&self) -> Array1<f64> {
        let mut lines = vec![self.start];
        let mut start = self.start;
        for domain in &self.sub_domains {
            let length = domain.end - start;
            let n = domain.cells;
            let r = domain.stretch_ratio;
            let mut width = if (r - 1.0).abs() < 1e-12 {
                length / n as f64
            } else {
                length * (r - 1.0) / (r.powi(n as i32) - 1.0)
            };
            let mut x = start;
            for _ in 0..n.saturating_sub(1) {
                x += width;
                width *= r;
                lines.push(x);
            }
            lines.push(domain.end);
            start = domain.end;
        }
        Array1::from_vec(lines)
    }
}

impl fmt::Display for GridlineConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let lines = self.gridlines();
        let (mut dmin, mut dmax) = (f64::INFINITY, 0.0_f64);
        for w in lines.windows(2) {
            let d = w[1] - w[0];
            dmin = dmin.min(d);
            dmax = dmax.max(d);
        }
        write!(
            f,
            "{}: [{}, {}], {} cells, min width {:.6}, max width {:.6}",
            self.direction,
            self.start,
            lines[lines.len() - 1],
            self.cells(),
            dmin,
            dmax
        )
    }
}

/// Enlarge the interval of length `length` centered at `center` by
/// `buf` on each side, then round its length up to a multiple of `width`
pub fn resize_for_uniform(length: f64, center: f64, width: f64, buf: f64) -> (f64, f64) {
    let n = ((length + 2.0 * buf) / width).ceil();
    let length = n * width;
    (center - length / 2.0, center + length / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn widths(lines: &Array1<f64>) -> Vec<f64> {
        lines.windows(2).into_iter().map(|w| w[1] - w[0]).collect()
    }

    #[test]
    fn test_uniform() {
        let config = GridlineConfig::from_segments("x", &[Segment::uniform(-1.0, 1.0, 0.1)]);
        assert_eq!(config.cells(), 20);
        let lines = config.gridlines();
        assert_eq!(lines.len(), 21);
        assert_eq!(lines[0], -1.0);
        assert_eq!(lines[20], 1.0);
        for w in widths(&lines) {
            assert_abs_diff_eq!(w, 0.1, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_stretched_starts_with_width() {
        let seg = Segment::stretched(1.0, 10.0, 0.1, 1.2, 1.0, false);
        let config = GridlineConfig::from_segments("x", &[seg]);
        let w = widths(&config.gridlines());
        assert_abs_diff_eq!(w[0], 0.1, epsilon = 1e-10);
        assert_abs_diff_eq!(w[1], 0.12, epsilon = 1e-10);
        assert!(w.iter().all(|wi| *wi <= 1.0 + 1e-10));
        assert_abs_diff_eq!(w.iter().sum::<f64>(), 9.0, epsilon = 1e-10);
    }

    #[test]
    fn test_reverse_mirrors() {
        let fwd = Segment::stretched(0.0, 5.0, 0.1, 1.1, 0.5, false);
        let rev = Segment::stretched(-5.0, 0.0, 0.1, 1.1, 0.5, true);
        let wf = widths(&GridlineConfig::from_segments("y", &[fwd]).gridlines());
        let mut wr = widths(&GridlineConfig::from_segments("y", &[rev]).gridlines());
        wr.reverse();
        assert_eq!(wf.len(), wr.len());
        for (a, b) in wf.iter().zip(wr.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_contiguous_segments() {
        let config = GridlineConfig::from_segments(
            "z",
            &[
                Segment::stretched(-4.0, -1.0, 0.1, 1.2, 1.0, true),
                Segment::uniform(-1.0, 1.0, 0.1),
                Segment::stretched(1.0, 4.0, 0.1, 1.2, 1.0, false),
            ],
        );
        let lines = config.gridlines();
        assert_eq!(lines.len(), config.cells() + 1);
        assert!(widths(&lines).iter().all(|w| *w > 0.0));
        assert_eq!(lines[0], -4.0);
        assert_eq!(lines[lines.len() - 1], 4.0);
    }

    #[test]
    fn test_yaml() {
        let config = GridlineConfig::from_segments("x", &[Segment::uniform(0.0, 1.0, 0.25)]);
        let s = serde_yaml::to_string(&config).unwrap();
        assert!(s.contains("subDomains"));
        assert!(s.contains("stretchRatio"));
        let back: GridlineConfig = serde_yaml::from_str(&s).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_resize_for_uniform() {
        let (xs, xe) = resize_for_uniform(1.0, 0.0, 0.03, 0.05);
        let n = ((xe - xs) / 0.03).round();
        assert_abs_diff_eq!((xe - xs) / n, 0.03, epsilon = 1e-12);
        assert!(xe - xs >= 1.1);
        assert_abs_diff_eq!(xs + xe, 0.0, epsilon = 1e-12);
    }
}
