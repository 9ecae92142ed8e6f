#[macro_use]
extern crate log;

mod options;
mod stats;

use clap::Parser;
use itertools::Itertools;
use options::*;
use pbrt_core::filter::*;
use pbrt_core::geometry::*;
use pbrt_core::pbrt::*;
use pbrt_core::sampler::*;
use samplers::*;
use stats::*;
use std::thread;

/// Labels of the camera sample dimensions, in consumption order.
const CAMERA_DIMENSIONS: [&str; 5] = ["film x", "film y", "time", "lens x", "lens y"];

/// The sample vectors drawn for one pixel.
struct PixelSamples {
    /// Position of the pixel in the work list.
    pixel_index: usize,

    /// The pixel.
    pixel: Point2i,

    /// Camera sample and additional 1D values of every pixel sample.
    samples: Vec<(CameraSample, Vec<Float>)>,
}

fn main() {
    // Initialize `env_logger`.
    env_logger::init();

    let options = Options::parse();
    if let Err(e) = run(&options) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(options: &Options) -> Result<(), String> {
    if let Some(state) = &options.debug_state {
        return replay(state, options.streams);
    }

    let sampler = make_sampler(
        &options.sampler,
        &options.sampler_params(),
        options.full_resolution(),
    )?;

    let pixels = options.pixels();
    let n_threads = min(options.threads(), max(pixels.len(), 1));
    let filter = BoxFilter::default();
    let results = sample_pixels(
        &sampler,
        &pixels,
        &filter,
        options.no_jitter,
        options.dims,
        n_threads,
    )?;

    if options.stats {
        print_stats(&results);
    } else {
        for r in results.iter() {
            for (sample_index, (cs, u)) in r.samples.iter().enumerate() {
                println!(
                    "pixel: {} sample: {} {} u: [{}]",
                    r.pixel,
                    sample_index,
                    cs,
                    u.iter().join(", ")
                );
            }
        }
    }
    Ok(())
}

/// Draws the sample vectors of the given pixels on worker threads, each with
/// its own clone of the sampler.
///
/// * `sampler`              - The sampler.
/// * `pixels`               - The pixels.
/// * `filter`               - Pixel reconstruction filter.
/// * `disable_pixel_jitter` - Place film samples at pixel centers.
/// * `dims`                 - Number of 1D values drawn after the camera sample.
/// * `n_threads`            - Number of worker threads.
fn sample_pixels(
    sampler: &SamplerHandle,
    pixels: &[Point2i],
    filter: &BoxFilter,
    disable_pixel_jitter: bool,
    dims: usize,
    n_threads: usize,
) -> Result<Vec<PixelSamples>, String> {
    let spp = sampler.samples_per_pixel();
    let samplers = sampler.clone_samplers(n_threads);
    debug!("Sampling {} pixels with {} threads", pixels.len(), n_threads);

    thread::scope(|scope| {
        let (tx_collector, rx_collector) = crossbeam_channel::bounded::<PixelSamples>(n_threads);
        let (tx_worker, rx_worker) = crossbeam_channel::bounded::<usize>(n_threads);

        // Results arrive in completion order.
        let collector = scope.spawn(move || {
            let mut results: Vec<PixelSamples> = rx_collector.iter().collect();
            results.sort_by_key(|r| r.pixel_index);
            results
        });

        for mut sampler in samplers {
            let rx_worker = rx_worker.clone();
            let tx_collector = tx_collector.clone();

            scope.spawn(move || {
                for pixel_index in rx_worker.iter() {
                    let pixel = pixels[pixel_index];
                    let samples = (0..spp)
                        .map(|sample_index| {
                            sampler.start_pixel_sample(pixel, sample_index, 0);
                            let cs = get_camera_sample(&mut sampler, pixel, filter, disable_pixel_jitter);
                            let u = (0..dims).map(|_| sampler.get_1d()).collect();
                            (cs, u)
                        })
                        .collect();

                    let result = PixelSamples {
                        pixel_index,
                        pixel,
                        samples,
                    };
                    if tx_collector.send(result).is_err() {
                        break;
                    }
                }
            });
        }
        drop(rx_worker);
        drop(tx_collector);

        for pixel_index in 0..pixels.len() {
            tx_worker
                .send(pixel_index)
                .map_err(|e| format!("Unable to queue pixel {}. {}", pixels[pixel_index], e))?;
        }
        drop(tx_worker);

        collector
            .join()
            .map_err(|_| String::from("Sample collector thread panicked."))
    })
}

/// Prints the mean, minimum and maximum of every dimension. The film position
/// is reported as an offset within its pixel.
///
/// * `results` - Samples of every pixel.
fn print_stats(results: &[PixelSamples]) {
    let mut stats: Vec<DimensionStats> = vec![];
    for r in results.iter() {
        let p = Point2f::from(r.pixel);
        for (cs, u) in r.samples.iter() {
            let mut values = vec![
                cs.p_film.x - p.x,
                cs.p_film.y - p.y,
                cs.time,
                cs.p_lens.x,
                cs.p_lens.y,
            ];
            values.extend_from_slice(u);
            accumulate(&mut stats, &values);
        }
    }

    for (d, s) in stats.iter().enumerate() {
        match CAMERA_DIMENSIONS.get(d) {
            Some(label) => println!("dimension {} ({}): {}", d, label, s),
            None => println!("dimension {} (1d {}): {}", d, d - CAMERA_DIMENSIONS.len(), s),
        }
    }
}

/// Replays a dumped MLT sample vector and prints the values of every stream.
///
/// * `state`     - Comma separated values from `MLTSampler::dump_state()`.
/// * `n_streams` - Number of streams interleaved in the vector.
fn replay(state: &str, n_streams: usize) -> Result<(), String> {
    if n_streams == 0 {
        return Err(String::from("--streams must be at least 1."));
    }

    let mut sampler = DebugMLTSampler::from_dump_state(state, n_streams)?;
    let n_values = sampler.source().values().len();
    info!("Created {}", sampler);

    sampler.start_iteration();
    for stream in 0..min(n_streams, n_values) {
        sampler.start_stream(stream);
        let count = (n_values - stream + n_streams - 1) / n_streams;
        let u: Vec<Float> = (0..count).map(|_| sampler.get_1d()).collect();
        println!("stream: {} u: [{}]", stream, u.iter().join(", "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_count_does_not_change_samples() {
        let mut params = pbrt_core::paramset::ParamSet::new();
        params.add_int("pixelsamples", &[4]);
        let sampler = make_sampler("pmj02bn", &params, Point2i::new(4, 4)).unwrap();
        let pixels: Vec<Point2i> = itertools::iproduct!(0..4, 0..4)
            .map(|(y, x)| Point2i::new(x, y))
            .collect();
        let filter = BoxFilter::default();

        let one = sample_pixels(&sampler, &pixels, &filter, false, 3, 1).unwrap();
        let four = sample_pixels(&sampler, &pixels, &filter, false, 3, 4).unwrap();
        assert_eq!(one.len(), 16);
        for (a, b) in one.iter().zip(four.iter()) {
            assert_eq!(a.pixel, b.pixel);
            assert_eq!(a.samples, b.samples);
        }
    }

    #[test]
    fn film_samples_stay_in_pixel() {
        let mut params = pbrt_core::paramset::ParamSet::new();
        params.add_int("pixelsamples", &[8]);
        let sampler = make_sampler("halton", &params, Point2i::new(8, 8)).unwrap();
        let pixels = vec![Point2i::new(2, 5), Point2i::new(7, 0)];
        let results = sample_pixels(&sampler, &pixels, &BoxFilter::default(), false, 0, 2).unwrap();
        for r in results.iter() {
            for (cs, u) in r.samples.iter() {
                assert!(u.is_empty());
                assert!(cs.p_film.x >= r.pixel.x as Float && cs.p_film.x <= (r.pixel.x + 1) as Float);
                assert!(cs.p_film.y >= r.pixel.y as Float && cs.p_film.y <= (r.pixel.y + 1) as Float);
            }
        }
    }

    #[test]
    fn sample_count_follows_spp() {
        let options = Options::parse_from(["samplertest", "--sampler", "stratified", "--spp", "8"]);
        let sampler = make_sampler(
            &options.sampler,
            &options.sampler_params(),
            options.full_resolution(),
        )
        .unwrap();
        let results =
            sample_pixels(&sampler, &options.pixels(), &BoxFilter::default(), false, 1, 1).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].samples.len(), 8);
    }

    #[test]
    fn replay_rejects_bad_input() {
        assert!(replay("0.5,0.25", 0).is_err());
        assert!(replay("0.5,abc", 1).is_err());
        assert!(replay("0.5,0.25,0.125", 2).is_ok());
    }
}
