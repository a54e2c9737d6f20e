#![allow(dead_code)]

use approx::assert_relative_eq;
use nalgebra::Vector3;
use orrery::bodies::{BodyKind, BodyRecord};

pub fn assert_vector_close(actual: &Vector3<f64>, expected: &Vector3<f64>, epsilon: f64) {
    assert_relative_eq!(actual.x, expected.x, epsilon = epsilon);
    assert_relative_eq!(actual.y, expected.y, epsilon = epsilon);
    assert_relative_eq!(actual.z, expected.z, epsilon = epsilon);
}

pub fn earth() -> BodyRecord {
    BodyRecord::new()
        .with("name", "Earth")
        .with("type", "0")
        .with("a", "1.00000018")
        .with("e", "0.01673163")
        .with("inc", "-0.00054346")
        .with("l", "100.46691572")
        .with("w", "102.93005885")
        .with("omega", "-5.11260389")
        .with("aDot", "-0.00000003")
        .with("eDot", "-0.00003661")
        .with("iDot", "-0.01337178")
        .with("lDot", "35999.37306329")
        .with("wDot", "0.31795260")
        .with("omegaDot", "-0.24123856")
        .with("radius", "6378.137")
        .with("mass", "5972190")
        .with("H", "-3.99")
        .with("axisRA", "0")
        .with("axisDec", "90")
        .with("thetaDot", "13150000")
}

pub fn moon() -> BodyRecord {
    BodyRecord::new()
        .with("name", "Moon")
        .with("type", "1")
        .with("orbiting", "Earth")
        .with("a", "384400")
        .with("e", "0.0554")
        .with("inc", "5.16")
        .with("w", "318.15")
        .with("omega", "125.08")
        .with("m", "135.27")
        .with("P", "27.322")
        .with("radius", "1737.4")
        .with("mass", "73476.7")
        .with("H", "0.21")
}

pub fn jupiter() -> BodyRecord {
    BodyRecord::new()
        .with("name", "Jupiter")
        .with("type", "0")
        .with("a", "5.20248019")
        .with("e", "0.04853590")
        .with("inc", "1.29861416")
        .with("l", "34.33479152")
        .with("w", "14.27495244")
        .with("omega", "100.29282654")
        .with("aDot", "-0.00002864")
        .with("eDot", "0.00018026")
        .with("iDot", "-0.00322699")
        .with("lDot", "3034.90371757")
        .with("wDot", "0.18199196")
        .with("omegaDot", "0.13024619")
        .with("b", "-0.00012452")
        .with("c", "0.06064060")
        .with("s", "-0.35635438")
        .with("f", "38.35125000")
        .with("radius", "71492")
        .with("mass", "1898130000")
        .with("H", "-9.4")
        .with("axisRA", "268.057")
        .with("axisDec", "64.495")
}

pub fn pluto() -> BodyRecord {
    BodyRecord::new()
        .with("name", "Pluto")
        .with("type", "1")
        .with("a", "39.48211675")
        .with("e", "0.24882730")
        .with("inc", "17.14001206")
        .with("l", "238.92903833")
        .with("w", "224.06891629")
        .with("omega", "110.30393684")
        .with("aDot", "-0.00031596")
        .with("eDot", "0.00005170")
        .with("iDot", "0.00004818")
        .with("lDot", "145.20780515")
        .with("wDot", "-0.04062942")
        .with("omegaDot", "-0.01183482")
        .with("radius", "1188.3")
        .with("mass", "13030")
        .with("H", "-0.7")
        .with("axisRA", "132.993")
        .with("axisDec", "-6.163")
}

pub fn charon() -> BodyRecord {
    BodyRecord::new()
        .with("name", "Charon")
        .with("type", "2")
        .with("orbiting", "Pluto")
        .with("orbitRef", "Q")
        .with("a", "19591")
        .with("e", "0.0002")
        .with("inc", "0.08")
        .with("w", "146.106")
        .with("omega", "26.928")
        .with("m", "131.070")
        .with("P", "6.387221")
        .with("radius", "606")
        .with("mass", "1586")
        .with("H", "1.0")
}

pub fn ceres() -> BodyRecord {
    BodyRecord::new()
        .with("name", "Ceres")
        .with("type", "1")
        .with("num", "1")
        .with("epoch", "60600")
        .with("a", "2.7665")
        .with("e", "0.0796")
        .with("inc", "10.59")
        .with("w", "73.29")
        .with("omega", "80.25")
        .with("m", "145.84")
        .with("H", "3.34")
        .with("G", "0.12")
}

pub fn halley() -> BodyRecord {
    BodyRecord::new()
        .with("name", "Halley")
        .with("q", "0.5860")
        .with("e", "0.9671")
        .with("inc", "162.26")
        .with("w", "169.75")
        .with("omega", "58.42")
        .with("Tp", "19860209.4589")
        .with("H", "5.5")
        .with("G", "0.15")
}

pub fn interstellar() -> BodyRecord {
    BodyRecord::new()
        .with("name", "Oumuamua")
        .with("q", "0.2553")
        .with("e", "1.2011")
        .with("inc", "122.74")
        .with("w", "265.4")
        .with("omega", "24.6")
        .with("Tp", "20170909.4886")
        .with("H", "22.1")
}

/// Sun-orbiting and satellite bodies of every kind.
pub fn solar_system() -> Vec<(BodyKind, BodyRecord)> {
    vec![
        (BodyKind::Moon, moon()),
        (BodyKind::Planet, earth()),
        (BodyKind::Planet, jupiter()),
        (BodyKind::Planet, pluto()),
        (BodyKind::Moon, charon()),
        (BodyKind::Asteroid, ceres()),
        (BodyKind::Comet, halley()),
        (BodyKind::Comet, interstellar()),
    ]
}
