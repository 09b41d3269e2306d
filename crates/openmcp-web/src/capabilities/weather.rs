//! Weather capabilities

use openmcp_tools::{
    from_arguments, handler_fn, reply, Arguments, Capability, ParamDescriptor, ParamType,
    RegistryError,
};
use openmcp_upstream::WeatherClient;
use serde::Deserialize;

pub const TAG: &str = "天气预报";

#[derive(Deserialize)]
struct CityName {
    cityname: String,
}

#[derive(Deserialize)]
struct Coordinates {
    latitude: f64,
    longitude: f64,
}

pub fn capabilities(client: &WeatherClient) -> Result<Vec<Capability>, RegistryError> {
    let by_city = client.clone();
    let by_coordinates = client.clone();

    Ok(vec![
        Capability::post("/get_weather/cityname")
            .name("get_weather_cityname")
            .description(
                "通过城市名称（中国城市使用拼音）获取天气信息\n\n\
                 返回 code（0 成功 -1 失败）、weather 天气信息、msg 成功或失败信息",
            )
            .tag(TAG)
            .param(
                ParamDescriptor::body("cityname", ParamType::String)
                    .describe("城市名称（中国城市使用拼音）"),
            )
            .handler(handler_fn(move |args: Arguments| {
                let client = by_city.clone();
                async move {
                    let CityName { cityname } = from_arguments(args)?;
                    reply(&client.by_city_name(&cityname).await)
                }
            }))
            .build()?,
        Capability::post("/get_weather/latitude_longitude")
            .name("get_weather_latitude_longitude")
            .description(
                "通过经纬度获取天气信息\n\n\
                 返回 code（0 成功 -1 失败）、weather 天气信息、msg 成功或失败信息",
            )
            .tag(TAG)
            .param(ParamDescriptor::body("latitude", ParamType::Number).describe("纬度"))
            .param(ParamDescriptor::body("longitude", ParamType::Number).describe("经度"))
            .handler(handler_fn(move |args: Arguments| {
                let client = by_coordinates.clone();
                async move {
                    let Coordinates { latitude, longitude } = from_arguments(args)?;
                    reply(&client.by_coordinates(latitude, longitude).await)
                }
            }))
            .build()?,
    ])
}
