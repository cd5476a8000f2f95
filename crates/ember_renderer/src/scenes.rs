//! Preset scenes selectable by number.
//!
//! Every preset builds a fresh world, camera and render settings. Scenes
//! are constructed inside each render unit, so nothing here is shared.

use crate::error::BvhError;
use crate::hittable::{Hittable, HittableList};
use crate::material::{Dielectric, DiffuseLight, Lambertian, Material, Metal};
use crate::sampling::{gen_f64, gen_range, random_vec3};
use crate::texture::{CheckerTexture, ImageData, ImageTexture, NoiseTexture, Texture};
use crate::{
    AxisRect, Background, BvhNode, Camera, ConstantMedium, Cuboid, MovingSphere, RenderConfig,
    RotateY, Sphere, Translate,
};
use ember_math::{Color, Point3, Vec3};
use rand::RngCore;
use std::collections::HashMap;
use std::sync::Arc;

/// Name of the image asset used by the earth textures.
pub const EARTH_TEXTURE: &str = "earthmap";

const DEFAULT_IMAGE_WIDTH: u32 = 400;
const DEFAULT_ASPECT_RATIO: f64 = 16.0 / 9.0;
const DEFAULT_MAX_DEPTH: u32 = 50;
const FOCUS_DISTANCE: f64 = 10.0;
const SKY_BLUE: Color = Color::new(0.70, 0.80, 1.00);

/// Cornell scenes were laid out for a 600 pixel wide image.
pub const CORNELL_SCALE: f64 = 400.0 / 600.0;

/// A ready-to-render scene.
#[derive(Clone)]
pub struct Scene {
    pub world: Arc<dyn Hittable>,
    pub camera: Camera,
    pub config: RenderConfig,
    pub image_width: u32,
}

impl Scene {
    /// Height following the camera's aspect ratio, at least one row.
    pub fn image_height(&self) -> u32 {
        ((self.image_width as f64 / self.camera.aspect_ratio()) as u32).max(1)
    }
}

/// The selectable scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenePreset {
    RandomSpheres,
    TwoSpheres,
    TwoPerlinSpheres,
    Earth,
    EarthLight,
    CornellBox,
    CornellSmoke,
    FinalScene,
    SingleSphere,
}

impl ScenePreset {
    /// Map a scene selector to a preset. Unknown selectors (including 0)
    /// pick the Cornell smoke scene.
    pub fn from_selector(selector: i64) -> Self {
        match selector {
            1 => ScenePreset::RandomSpheres,
            2 => ScenePreset::TwoSpheres,
            3 => ScenePreset::TwoPerlinSpheres,
            4 => ScenePreset::Earth,
            5 => ScenePreset::EarthLight,
            6 => ScenePreset::CornellBox,
            8 => ScenePreset::FinalScene,
            9 => ScenePreset::SingleSphere,
            _ => ScenePreset::CornellSmoke,
        }
    }

    /// Build the world, camera and settings for this preset.
    pub fn build(
        self,
        images: &HashMap<String, ImageData>,
        rng: &mut dyn RngCore,
    ) -> Result<Scene, BvhError> {
        let mut config = RenderConfig {
            samples_per_pixel: 100,
            max_depth: DEFAULT_MAX_DEPTH,
            background: Background::Solid(SKY_BLUE),
        };
        let mut image_width = DEFAULT_IMAGE_WIDTH;
        let mut aspect_ratio = DEFAULT_ASPECT_RATIO;
        let mut vfov = 20.0;
        let mut aperture = 0.0;
        let mut look_from = Point3::new(13.0, 2.0, 3.0);
        let mut look_at = Point3::ZERO;

        let world: Arc<dyn Hittable> = match self {
            ScenePreset::RandomSpheres => {
                aperture = 0.1;
                Arc::new(random_spheres(rng)?)
            }
            ScenePreset::TwoSpheres => Arc::new(two_spheres()),
            ScenePreset::TwoPerlinSpheres => Arc::new(two_perlin_spheres(rng)),
            ScenePreset::Earth => {
                config.samples_per_pixel = 200;
                Arc::new(earth(images))
            }
            ScenePreset::EarthLight => {
                config.samples_per_pixel = 500;
                config.background = Background::Solid(Color::ZERO);
                look_from = Point3::new(26.0, 3.0, 6.0);
                look_at = Point3::new(0.0, 2.0, 0.0);
                Arc::new(earth_light(images))
            }
            ScenePreset::CornellBox | ScenePreset::CornellSmoke => {
                let s = CORNELL_SCALE;
                aspect_ratio = 1.0;
                image_width = (600.0 * s) as u32;
                config.samples_per_pixel = 200;
                config.background = Background::Solid(Color::ZERO);
                look_from = Point3::new(278.0 * s, 278.0 * s, -800.0 * s);
                look_at = Point3::new(278.0 * s, 278.0 * s, 0.0);
                vfov = 40.0;
                if self == ScenePreset::CornellBox {
                    Arc::new(cornell_box(s))
                } else {
                    Arc::new(BvhNode::new(
                        cornell_smoke(s).into_objects(),
                        0.0,
                        1.0,
                        rng,
                    )?)
                }
            }
            ScenePreset::FinalScene => {
                let s = 0.5;
                aspect_ratio = 1.0;
                image_width = (800.0 * s) as u32;
                config.background = Background::Solid(Color::ZERO);
                look_from = Point3::new(478.0 * s, 278.0 * s, -600.0 * s);
                look_at = Point3::new(278.0 * s, 278.0 * s, 0.0);
                vfov = 40.0;
                Arc::new(final_scene(images, s, rng)?)
            }
            ScenePreset::SingleSphere => {
                config.background = Background::SkyGradient;
                look_from = Point3::ZERO;
                look_at = Point3::new(0.0, 0.0, -1.0);
                vfov = 90.0;
                Arc::new(single_sphere())
            }
        };

        let mut camera = Camera::new()
            .with_position(look_from, look_at, Vec3::Y)
            .with_lens(vfov, aperture, FOCUS_DISTANCE)
            .with_aspect_ratio(aspect_ratio)
            .with_shutter(0.0, 1.0);
        camera.initialize();

        log::debug!("Built scene {:?} at {} pixels wide", self, image_width);

        Ok(Scene {
            world,
            camera,
            config,
            image_width,
        })
    }
}

fn lambertian(albedo: Color) -> Arc<dyn Material> {
    Arc::new(Lambertian::new(albedo))
}

/// Earth texture from the supplied assets, or the debug texture if the
/// asset is missing.
fn earth_texture(images: &HashMap<String, ImageData>) -> Arc<dyn Texture> {
    match images.get(EARTH_TEXTURE) {
        Some(image) => Arc::new(ImageTexture::new(Arc::new(image.clone()))),
        None => {
            log::warn!("Image asset {:?} not supplied; using debug texture", EARTH_TEXTURE);
            Arc::new(ImageTexture::unbound())
        }
    }
}

fn checker() -> Arc<dyn Texture> {
    Arc::new(CheckerTexture::from_colors(
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ))
}

/// Field of small random spheres around three large ones.
fn random_spheres(rng: &mut dyn RngCore) -> Result<BvhNode, BvhError> {
    let mut world = HittableList::new();

    world.push(Sphere::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::textured(checker())),
    ));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f64(rng);
            let center = Point3::new(
                a as f64 + 0.9 * gen_f64(rng),
                0.2,
                b as f64 + 0.9 * gen_f64(rng),
            );

            if (center - Point3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                // diffuse, bouncing upward during the shutter
                let albedo = random_vec3(rng, 0.0, 1.0) * random_vec3(rng, 0.0, 1.0);
                let center2 = center + Vec3::new(0.0, gen_range(rng, 0.0, 0.5), 0.0);
                world.push(MovingSphere::new(
                    (center, center2),
                    (0.0, 1.0),
                    0.2,
                    lambertian(albedo),
                ));
            } else if choose_mat < 0.95 {
                // metal
                let albedo = random_vec3(rng, 0.5, 1.0);
                let fuzz = gen_range(rng, 0.0, 0.5);
                world.push(Sphere::new(center, 0.2, Arc::new(Metal::new(albedo, fuzz))));
            } else {
                // glass
                world.push(Sphere::new(center, 0.2, Arc::new(Dielectric::new(1.5))));
            }
        }
    }

    world.push(Sphere::new(
        Point3::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    world.push(Sphere::new(
        Point3::new(-4.0, 1.0, 0.0),
        1.0,
        lambertian(Color::new(0.4, 0.2, 0.1)),
    ));
    world.push(Sphere::new(
        Point3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    ));

    log::debug!("Random sphere scene has {} objects", world.len());
    BvhNode::new(world.into_objects(), 0.0, 1.0, rng)
}

fn two_spheres() -> HittableList {
    let mut world = HittableList::new();
    let material: Arc<dyn Material> = Arc::new(Lambertian::textured(checker()));

    world.push(Sphere::new(Point3::new(0.0, -10.0, 0.0), 10.0, material.clone()));
    world.push(Sphere::new(Point3::new(0.0, 10.0, 0.0), 10.0, material));
    world
}

fn two_perlin_spheres(rng: &mut dyn RngCore) -> HittableList {
    let mut world = HittableList::new();
    let marble: Arc<dyn Material> =
        Arc::new(Lambertian::textured(Arc::new(NoiseTexture::new(4.0, rng))));

    world.push(Sphere::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        marble.clone(),
    ));
    world.push(Sphere::new(Point3::new(0.0, 2.0, 0.0), 2.0, marble));
    world
}

fn earth(images: &HashMap<String, ImageData>) -> HittableList {
    let mut world = HittableList::new();
    world.push(Sphere::new(
        Point3::ZERO,
        2.0,
        Arc::new(Lambertian::textured(earth_texture(images))),
    ));
    world
}

fn earth_light(images: &HashMap<String, ImageData>) -> HittableList {
    let mut world = HittableList::new();
    let surface: Arc<dyn Material> = Arc::new(Lambertian::textured(earth_texture(images)));

    world.push(Sphere::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        surface.clone(),
    ));
    world.push(Sphere::new(Point3::new(0.0, 2.0, 0.0), 2.0, surface));

    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(5.0)));
    world.push(AxisRect::xy(3.0, 5.0, 1.0, 3.0, -2.0, light.clone()));
    world.push(Sphere::new(Point3::new(-4.0, 4.0, 4.0), 1.0, light));
    world
}

/// Walls, floor and ceiling of the Cornell box with a ceiling light of
/// the given size and intensity.
fn cornell_walls(s: f64, light_rect: (f64, f64, f64, f64), light: Color) -> HittableList {
    let mut world = HittableList::new();

    let red = lambertian(Color::new(0.65, 0.05, 0.05));
    let white = lambertian(Color::splat(0.73));
    let green = lambertian(Color::new(0.12, 0.45, 0.15));
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(light));

    let side = 555.0 * s;
    world.push(AxisRect::yz(0.0, side, 0.0, side, side, green));
    world.push(AxisRect::yz(0.0, side, 0.0, side, 0.0, red));

    let (x0, x1, z0, z1) = light_rect;
    world.push(AxisRect::xz(x0 * s, x1 * s, z0 * s, z1 * s, 554.0 * s, light));
    world.push(AxisRect::xz(0.0, side, 0.0, side, 0.0, white.clone()));
    world.push(AxisRect::xz(0.0, side, 0.0, side, side, white.clone()));

    world.push(AxisRect::xy(0.0, side, 0.0, side, side, white));
    world
}

/// The two boxes of the Cornell box, rotated and moved into place.
fn cornell_blocks(s: f64) -> (Arc<dyn Hittable>, Arc<dyn Hittable>) {
    let white = lambertian(Color::splat(0.73));

    let tall = Cuboid::new(
        Point3::ZERO,
        Point3::new(165.0 * s, 330.0 * s, 165.0 * s),
        white.clone(),
    );
    let tall = RotateY::new(Arc::new(tall), 15.0);
    let tall = Translate::new(Arc::new(tall), Vec3::new(265.0 * s, 0.0, 295.0 * s));

    let short = Cuboid::new(Point3::ZERO, Point3::splat(165.0 * s), white);
    let short = RotateY::new(Arc::new(short), -18.0);
    let short = Translate::new(Arc::new(short), Vec3::new(130.0 * s, 0.0, 65.0 * s));

    (Arc::new(tall), Arc::new(short))
}

/// Cornell box with two white boxes under a bright square light.
pub fn cornell_box(s: f64) -> HittableList {
    let mut world = cornell_walls(s, (213.0, 343.0, 227.0, 332.0), Color::splat(15.0));
    let (tall, short) = cornell_blocks(s);
    world.add(tall);
    world.add(short);
    world
}

/// Cornell box whose boxes are replaced by smoke under a wide light.
pub fn cornell_smoke(s: f64) -> HittableList {
    let mut world = cornell_walls(s, (113.0, 443.0, 127.0, 432.0), Color::splat(7.0));
    let (tall, short) = cornell_blocks(s);
    world.push(ConstantMedium::new(tall, 0.01, Color::ZERO));
    world.push(ConstantMedium::new(short, 0.01, Color::new(0.0, 0.0, 1.0)));
    world
}

/// Everything at once: a floor of random-height boxes, a moving sphere,
/// glass, metal and foggy spheres, the earth, marble and a rotated cluster
/// of small spheres, all inside a thin global mist.
fn final_scene(
    images: &HashMap<String, ImageData>,
    s: f64,
    rng: &mut dyn RngCore,
) -> Result<BvhNode, BvhError> {
    let mut world = HittableList::new();

    let ground = lambertian(Color::new(0.48, 0.83, 0.53));
    let boxes_per_side = 20;
    for i in 0..boxes_per_side {
        for j in 0..boxes_per_side {
            let w = 100.0;
            let x0 = -1000.0 + i as f64 * w;
            let z0 = -1000.0 + j as f64 * w;
            let y0 = 0.0;
            let x1 = x0 + w;
            let y1 = gen_range(rng, 1.0, 101.0);
            let z1 = z0 + w;

            world.push(Cuboid::new(
                Point3::new(x0, y0, z0) * s,
                Point3::new(x1, y1, z1) * s,
                ground.clone(),
            ));
        }
    }

    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(7.0)));
    world.push(AxisRect::xz(123.0 * s, 423.0 * s, 147.0 * s, 412.0 * s, 554.0 * s, light));

    let center1 = Point3::new(400.0, 400.0, 200.0) * s;
    let center2 = center1 + Vec3::new(30.0 * s, 0.0, 0.0);
    world.push(MovingSphere::new(
        (center1, center2),
        (0.0, 1.0),
        50.0 * s,
        lambertian(Color::new(0.7, 0.3, 0.1)),
    ));

    world.push(Sphere::new(
        Point3::new(260.0, 150.0, 45.0) * s,
        50.0 * s,
        Arc::new(Dielectric::new(1.5)),
    ));
    world.push(Sphere::new(
        Point3::new(0.0, 150.0, 145.0) * s,
        50.0 * s,
        Arc::new(Metal::new(Color::new(0.8, 0.8, 0.9), 1.0)),
    ));

    // Glass shell filled with blue fog
    let boundary: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Point3::new(360.0, 150.0, 145.0) * s,
        70.0 * s,
        Arc::new(Dielectric::new(1.5)),
    ));
    world.add(boundary.clone());
    world.push(ConstantMedium::new(boundary, 0.2, Color::new(0.2, 0.4, 0.9)));

    let mist: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Point3::ZERO,
        5000.0 * s,
        Arc::new(Dielectric::new(1.5)),
    ));
    world.push(ConstantMedium::new(mist, 0.0001, Color::ONE));

    world.push(Sphere::new(
        Point3::new(400.0, 200.0, 400.0) * s,
        100.0 * s,
        Arc::new(Lambertian::textured(earth_texture(images))),
    ));
    world.push(Sphere::new(
        Point3::new(220.0, 280.0, 300.0) * s,
        80.0 * s,
        Arc::new(Lambertian::textured(Arc::new(NoiseTexture::new(0.1, rng)))),
    ));

    let white = lambertian(Color::splat(0.73));
    let cluster: Vec<Arc<dyn Hittable>> = (0..1000)
        .map(|_| {
            Arc::new(Sphere::new(random_vec3(rng, 0.0, 165.0 * s), 10.0 * s, white.clone()))
                as Arc<dyn Hittable>
        })
        .collect();
    let cluster = BvhNode::new(cluster, 0.0, 1.0, rng)?;
    let cluster = RotateY::new(Arc::new(cluster), 15.0);
    world.push(Translate::new(
        Arc::new(cluster),
        Vec3::new(-100.0 * s, 270.0 * s, 395.0 * s),
    ));

    log::debug!("Final scene has {} top-level objects", world.len());
    BvhNode::new(world.into_objects(), 0.0, 1.0, rng)
}

/// One diffuse sphere in front of the camera under an open sky.
fn single_sphere() -> HittableList {
    let mut world = HittableList::new();
    world.push(Sphere::new(
        Point3::new(0.0, 0.0, -1.0),
        0.5,
        lambertian(Color::splat(0.5)),
    ));
    world
}
