use android_puppeteer::render::{decode_screenshot, encode_png};
use android_puppeteer::{
    AdbBridge, Annotator, DeviceBridge, GridRenderer, InteractiveRegistry, LabelFont, Point, PuppeteerConfig,
    PuppeteerError, UiTree, extract_elements, inspect,
};
use image::{Rgba, RgbaImage};

const SETTINGS_DUMP: &str = r#"<?xml version='1.0' encoding='UTF-8' standalone='yes' ?>
<hierarchy rotation="0">
  <node index="0" text="" resource-id="" class="android.widget.FrameLayout" package="com.android.settings" content-desc="" checkable="false" checked="false" clickable="false" enabled="true" focusable="false" focused="false" scrollable="false" long-clickable="false" password="false" selected="false" visible-to-user="true" bounds="[0,0][400,800]">
    <node index="0" text="" resource-id="" class="android.widget.ImageButton" package="com.android.settings" content-desc="Navigate up" checkable="false" checked="false" clickable="true" enabled="true" focusable="true" focused="false" scrollable="false" long-clickable="false" password="false" selected="false" visible-to-user="true" bounds="[0,0][80,80]" />
    <node index="1" text="Settings" resource-id="android:id/title" class="android.widget.TextView" package="com.android.settings" content-desc="" checkable="false" checked="false" clickable="false" enabled="true" focusable="false" focused="false" scrollable="false" long-clickable="false" password="false" selected="false" visible-to-user="true" bounds="[100,20][300,60]" />
    <node index="2" text="" resource-id="" class="androidx.recyclerview.widget.RecyclerView" package="com.android.settings" content-desc="" checkable="false" checked="false" clickable="false" enabled="true" focusable="false" focused="false" scrollable="true" long-clickable="false" password="false" selected="false" visible-to-user="true" bounds="[0,100][400,800]">
      <node index="0" text="" resource-id="" class="android.widget.LinearLayout" package="com.android.settings" content-desc="" checkable="false" checked="false" clickable="true" enabled="true" focusable="true" focused="false" scrollable="false" long-clickable="false" password="false" selected="false" visible-to-user="true" bounds="[0,100][400,200]">
        <node index="0" text="Network &amp; internet" resource-id="android:id/title" class="android.widget.TextView" package="com.android.settings" content-desc="" checkable="false" checked="false" clickable="false" enabled="true" focusable="false" focused="false" scrollable="false" long-clickable="false" password="false" selected="false" visible-to-user="true" bounds="[20,110][380,150]" />
        <node index="1" text="Wi-Fi, hotspot" resource-id="android:id/summary" class="android.widget.TextView" package="com.android.settings" content-desc="" checkable="false" checked="false" clickable="false" enabled="true" focusable="false" focused="false" scrollable="false" long-clickable="false" password="false" selected="false" visible-to-user="true" bounds="[20,150][380,190]" />
      </node>
      <node index="1" text="" resource-id="" class="android.widget.LinearLayout" package="com.android.settings" content-desc="" checkable="false" checked="false" clickable="true" enabled="true" focusable="true" focused="false" scrollable="false" long-clickable="false" password="false" selected="false" visible-to-user="true">
        <node index="0" text="Connected devices" resource-id="android:id/title" class="android.widget.TextView" package="com.android.settings" content-desc="" checkable="false" checked="false" clickable="false" enabled="true" focusable="false" focused="false" scrollable="false" long-clickable="false" password="false" selected="false" visible-to-user="true" bounds="[20,210][380,250]" />
      </node>
      <node index="2" text="" resource-id="" class="android.widget.Switch" package="com.android.settings" content-desc="" checkable="true" checked="false" clickable="true" enabled="true" focusable="true" focused="false" scrollable="false" long-clickable="false" password="false" selected="false" visible-to-user="true" bounds="[300,300][380,340]" />
      <node index="3" text="" resource-id="" class="android.widget.FrameLayout" package="com.android.settings" content-desc="" checkable="false" checked="false" clickable="false" enabled="true" focusable="false" focused="false" scrollable="false" long-clickable="false" password="false" selected="false" visible-to-user="true" bounds="[0,390][400,450]">
        <node index="0" text="Battery" resource-id="android:id/title" class="android.widget.TextView" package="com.android.settings" content-desc="" checkable="false" checked="false" clickable="false" enabled="true" focusable="false" focused="false" scrollable="false" long-clickable="false" password="false" selected="false" visible-to-user="true" bounds="[20,400][380,440]" />
      </node>
      <node index="4" text="Off screen" resource-id="" class="android.widget.Button" package="com.android.settings" content-desc="" checkable="false" checked="false" clickable="true" enabled="true" focusable="true" focused="false" scrollable="false" long-clickable="false" password="false" selected="false" visible-to-user="false" bounds="[0,900][400,1000]" />
    </node>
  </node>
</hierarchy>"#;

fn screenshot_png(width: u32, height: u32) -> Vec<u8> {
    let mut image = RgbaImage::from_pixel(width, height, Rgba([250, 250, 250, 255]));
    for y in 100..200 {
        for x in 0..width {
            image.put_pixel(x, y, Rgba([220, 230, 240, 255]));
        }
    }
    encode_png(&image).expect("Failed to encode test screenshot")
}

#[test]
fn test_extract_settings_screen() {
    let elements = extract_elements(SETTINGS_DUMP, &InteractiveRegistry::default())
        .expect("Failed to extract elements");

    let names: Vec<_> = elements.elements().map(|e| e.name().to_string()).collect();
    assert_eq!(
        names,
        vec!["Navigate up", "RecyclerView", "Network & internet Wi-Fi, hotspot", "Switch"]
    );

    let indices: Vec<_> = elements.indices().copied().collect();
    assert_eq!(indices, vec![0, 1, 2, 3]);

    // Plain "Battery" text is not interactive; the row without bounds is skipped
    assert_eq!(elements.find_by_name("Battery"), None);
    assert_eq!(elements.find_by_name("Connected devices"), None);

    let switch = elements.get(3).unwrap();
    assert_eq!(switch.center(), Point::new(340, 320));
    assert_eq!(elements.find_at(Point::new(340, 320)), Some(3));
    assert_eq!(elements.find_at(Point::new(200, 150)), Some(2));
}

#[test]
fn test_extraction_is_pure() {
    let registry = InteractiveRegistry::default();
    let first = UiTree::parse(SETTINGS_DUMP, &registry).unwrap();
    let second = UiTree::parse(SETTINGS_DUMP, &registry).unwrap();

    assert_eq!(first.elements, second.elements);
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    assert_eq!(first.count_nodes(), 13);
}

#[test]
fn test_custom_registry_changes_classification() {
    let registry = InteractiveRegistry::empty();
    let elements = extract_elements(SETTINGS_DUMP, &registry).unwrap();

    // Without the class registry, the non-focusable RecyclerView drops out
    assert_eq!(elements.find_by_name("RecyclerView"), None);
    assert_eq!(elements.len(), 3);
}

#[test]
fn test_malformed_dump_is_fatal() {
    let truncated = &SETTINGS_DUMP[..SETTINGS_DUMP.len() / 2];
    let result = extract_elements(truncated, &InteractiveRegistry::default());
    assert!(matches!(result, Err(PuppeteerError::ParseFailed(_))));
}

#[test]
fn test_annotate_settings_screen() {
    let elements = extract_elements(SETTINGS_DUMP, &InteractiveRegistry::default()).unwrap();
    let annotator = Annotator::new(LabelFont::bitmap(1)).with_seed(42);

    let annotated = annotator
        .render(&screenshot_png(400, 800), &elements, 0.5, 15)
        .expect("Failed to annotate");

    assert_eq!(annotated.image().dimensions(), (230, 430));
    assert_eq!(annotated.labels().len(), elements.len());

    let (width, height) = annotated.image().dimensions();
    for label in annotated.labels() {
        assert!(label.x >= 0 && label.y >= 0, "label {} off canvas", label.index);
        assert!(label.y as u32 + label.height <= height);
        // Labels wider than the canvas are pinned to the left edge
        assert!(label.x == 0 || label.x as u32 + label.width <= width);
    }

    // Back button box lands at (15, 15); its 12px label sits 2px above it
    let back = annotated.labels()[0];
    assert_eq!((back.x, back.y), (15, 1));

    // Round-trips through PNG unchanged
    let png = annotated.to_png().unwrap();
    assert_eq!(&decode_screenshot(&png).unwrap(), annotated.image());

    // Same seed, same pixels
    let again = annotator.render(&screenshot_png(400, 800), &elements, 0.5, 15).unwrap();
    assert_eq!(again.image(), annotated.image());
}

#[test]
fn test_grid_and_comparison() {
    let renderer = GridRenderer::new(LabelFont::bitmap(1));
    let shot = screenshot_png(400, 400);

    let grid = renderer.render_grid(&shot, 80).expect("Failed to render grid");
    assert_eq!(grid.vertical, vec![0, 80, 160, 240, 320, 400]);
    assert_eq!(grid.horizontal, vec![0, 80, 160, 240, 320, 400]);
    assert_eq!(grid.coordinate_labels().len(), 36);
    assert_eq!(grid.image.dimensions(), (400, 400));

    let comparison = renderer.render_comparison(&shot, 80).unwrap();
    assert_eq!(comparison.width(), 2 * 400 + 20);
    assert!(comparison.height() > 400);
}

#[test]
fn test_inspect_with_stub_bridge() {
    struct StubBridge(Vec<u8>);

    impl DeviceBridge for StubBridge {
        fn hierarchy_xml(&self) -> android_puppeteer::Result<String> {
            Ok(SETTINGS_DUMP.to_string())
        }

        fn screenshot_png(&self) -> android_puppeteer::Result<Vec<u8>> {
            Ok(self.0.clone())
        }
    }

    let config = PuppeteerConfig::new().scale(1.0).padding(0).color_seed(3);
    let inspection = inspect(&StubBridge(screenshot_png(400, 800)), &config).unwrap();

    assert!(inspection.annotated);
    assert_eq!(inspection.elements.len(), 4);
    assert_eq!(decode_screenshot(&inspection.image_png).unwrap().dimensions(), (400, 800));
}

#[test]
#[ignore] // Requires adb and a connected device
fn test_live_device_inspection() {
    let config = PuppeteerConfig::default();
    let bridge = AdbBridge::from_config(&config);

    let devices = bridge.list_devices().expect("Failed to list devices");
    println!("Devices: {}", serde_json::to_string_pretty(&devices).unwrap());

    let inspection = inspect(&bridge, &config).expect("Failed to inspect device");
    println!("Interactive elements: {}", inspection.elements.len());
    println!("{}", inspection.elements.to_json().unwrap());
    assert!(!inspection.image_png.is_empty());
}

#[test]
fn test_annotate_element_with_max_bounds() {
    let xml = r#"<hierarchy rotation="0">
  <node class="android.widget.Button" text="Stretched" clickable="true" bounds="[0,0][2147483647,100]" />
</hierarchy>"#;
    let elements = extract_elements(xml, &InteractiveRegistry::default()).unwrap();
    assert_eq!(elements.len(), 1);

    let annotated = Annotator::new(LabelFont::bitmap(1))
        .with_seed(9)
        .render(&screenshot_png(200, 200), &elements, 1.0, 15)
        .expect("Extreme bounds should still render");
    assert_eq!(annotated.image().dimensions(), (230, 230));
    assert_eq!(annotated.labels()[0].x, 15);
}
